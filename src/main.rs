use clap::{Parser, Subcommand};
use sigorta_client::auth::{
    check_access, Access, FileSessionStore, LogNavigator, Route, SessionManager,
};
use sigorta_client::config::Config;
use sigorta_client::http::{ApiClient, PaymentMethod, ProductType, QuoteResponse};
use sigorta_client::providers::{display_name, ProviderRegistry};
use sigorta_client::services::{
    BoardState, PolicyWorkflow, QuoteBoard, QuoteForm, QuoteMode, RequestBuilder,
};
use sigorta_client::utils::{format_seconds, format_try, mask_sensitive};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "sigorta-client", version, about = "EES Sigorta teklif ve poliçe istemcisi")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Giriş yap ve oturumu kaydet
    Login { email: String, password: String },
    Register {
        email: String,
        password: String,
        name: String,
    },
    Logout,
    Whoami,
    /// Provider durumlarını listele
    Providers,
    /// Form JSON dosyasından teklif al
    Quote {
        form: PathBuf,
        #[arg(long, value_enum, default_value_t = ProductType::Trafik)]
        product: ProductType,
        /// Sadece bu provider'dan teklif al (varsayılan: karşılaştırma)
        #[arg(long)]
        provider: Option<String>,
        /// Varsayılan provider'dan (DEFAULT_PROVIDER) tek teklif al
        #[arg(long, conflicts_with = "provider")]
        single: bool,
        /// Alınan teklifleri bu dosyaya yaz
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Kaydedilmiş tekliflerden birini poliçeye çevir
    Policy {
        quotes: PathBuf,
        company: String,
        #[arg(long, value_enum, default_value_t = PaymentMethod::CreditCard)]
        payment: PaymentMethod,
        #[arg(long)]
        installments: Option<u8>,
    },
    /// Geçmiş teklifler
    Quotes,
    Policies,
    Health,
}

impl Command {
    fn route(&self, product: Option<ProductType>) -> Route {
        match self {
            Command::Login { .. } | Command::Register { .. } | Command::Logout | Command::Health => {
                Route::Login
            }
            Command::Whoami => Route::Ayarlar,
            Command::Providers => Route::Dashboard,
            Command::Quote { .. } => match product {
                Some(ProductType::Kasko) => Route::Kasko,
                Some(ProductType::Konut) => Route::Konut,
                Some(ProductType::Saglik) => Route::Saglik,
                _ => Route::Trafik,
            },
            Command::Policy { .. } | Command::Policies => Route::Policeler,
            Command::Quotes => Route::Teklifler,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logging setup
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("API: {}", config.api_url);

    let store = Arc::new(FileSessionStore::new(&config.session_file));
    let session = Arc::new(SessionManager::hydrate(
        store,
        Arc::new(LogNavigator),
        config.login_path.clone(),
    ));
    let client = ApiClient::new(&config, session.clone())?;

    let product = match &cli.command {
        Command::Quote { product, .. } => Some(*product),
        _ => None,
    };
    let route = cli.command.route(product);
    if let Access::Redirect(path) = check_access(route, session.snapshot().as_ref(), session.login_path()) {
        eprintln!("⛔ {} sayfasına erişim yok, yönlendirme: {}", route.path(), path);
        return Ok(());
    }

    match cli.command {
        Command::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            println!("✅ Giriş başarılı: {} ({})", user.name, user.role);
        }
        Command::Register {
            email,
            password,
            name,
        } => {
            let user = client.register(&email, &password, &name).await?;
            println!("✅ Kayıt başarılı: {}", user.email);
        }
        Command::Logout => {
            session.logout()?;
            println!("👋 Çıkış yapıldı");
        }
        Command::Whoami => {
            if let Some(active) = session.snapshot() {
                println!("{} <{}>", active.user.name, active.user.email);
                println!("Rol: {:?}", active.role);
                if let Some(phone) = &active.user.phone {
                    println!("Telefon: {}", mask_sensitive(phone));
                }
            }
        }
        Command::Providers => {
            let registry = ProviderRegistry::from_response(client.get_providers().await?);
            for provider in registry.get_all_providers() {
                let status = if provider.active { "✅ Aktif" } else { "⏸️  Pasif" };
                println!(
                    "{:<18} {} [{}]{}",
                    display_name(&provider.name),
                    status,
                    provider.supported_products.join(", "),
                    provider
                        .reason
                        .as_ref()
                        .map(|r| format!(" ({})", r))
                        .unwrap_or_default()
                );
            }
            println!("Aktif: {}/{}", registry.get_active_providers().len(), registry.get_all_providers().len());
        }
        Command::Quote {
            form,
            product,
            provider,
            single,
            out,
        } => {
            let form: QuoteForm = serde_json::from_str(&std::fs::read_to_string(&form)?)?;
            let request = RequestBuilder::new(config.webhook_url.clone()).build(&form, product);
            tracing::info!(
                "📥 Teklif formu: tckn={}, plaka={}",
                mask_sensitive(&request.insured.tckn),
                request.vehicle.plate
            );

            let mode = match provider {
                Some(name) => QuoteMode::Single(name),
                None if single => QuoteMode::Single(config.default_provider.clone()),
                None => QuoteMode::Compare,
            };

            let board = QuoteBoard::new();
            board.submit(&client, &mode, &request).await;

            match board.state() {
                BoardState::Ready(quotes) => {
                    print_comparison(&board);
                    if let Some(path) = out {
                        std::fs::write(&path, serde_json::to_string_pretty(&quotes)?)?;
                        println!("💾 Teklifler kaydedildi: {}", path.display());
                    }
                }
                BoardState::Failed(e) => return Err(e.into()),
                BoardState::Empty | BoardState::Loading => {}
            }
        }
        Command::Policy {
            quotes,
            company,
            payment,
            installments,
        } => {
            let quotes: Vec<QuoteResponse> = serde_json::from_str(&std::fs::read_to_string(&quotes)?)?;
            let quote = quotes
                .into_iter()
                .find(|q| q.company.eq_ignore_ascii_case(&company))
                .ok_or_else(|| format!("{} için kayıtlı teklif yok", company))?;

            let mut workflow = PolicyWorkflow::new();
            workflow.select(quote)?;

            let options = workflow.installment_options();
            let choice = match installments {
                Some(count) => options
                    .iter()
                    .find(|o| o.choice.count() == count)
                    .map(|o| o.choice.clone())
                    .ok_or_else(|| {
                        let offered: Vec<String> =
                            options.iter().map(|o| o.choice.count().to_string()).collect();
                        format!("{} taksit sunulmuyor. Seçenekler: {}", count, offered.join(", "))
                    })?,
                None => {
                    workflow.configure_defaults()?;
                    workflow
                        .draft()
                        .map(|d| d.installment.clone())
                        .ok_or("taksit seçilemedi")?
                }
            };
            workflow.configure(payment, choice)?;

            if let (Some(quote), Some(commission)) = (workflow.quote(), workflow.commission()) {
                println!("{} - {}", display_name(&quote.company), format_try(quote.premium.gross));
                println!("Ödeme: {}", payment.label());
                if let Some(inst) = workflow.selected_installment().filter(|i| i.count > 1) {
                    println!("Taksit Başına: {} x {}", inst.count, format_try(inst.per_installment));
                }
                println!("Komisyon (10%): {}", format_try(commission));
            }

            let policy = workflow.submit(&client).await?;
            println!("✅ Poliçe başarıyla oluşturuldu! Poliçe No: {}", policy.policy_number);
            workflow.close()?;
        }
        Command::Quotes => {
            let list = client.list_quotes().await?;
            for q in &list.quotes {
                println!("{}  {:<18} {:>14}  {}  {}", q.id, display_name(&q.provider), format_try(q.premium), q.status, q.created_at);
            }
            println!("Toplam: {}", list.total);
        }
        Command::Policies => {
            for p in client.list_policies().await? {
                println!(
                    "{}  {:<18} {:>14}  {}",
                    p.policy_number,
                    p.provider.as_deref().map(display_name).unwrap_or_default(),
                    p.premium.map(format_try).unwrap_or_default(),
                    p.status.unwrap_or_default()
                );
            }
        }
        Command::Health => {
            let health = client.health().await?;
            println!(
                "ok={} version={}",
                health.ok,
                health.version.unwrap_or_else(|| "?".to_string())
            );
        }
    }

    Ok(())
}

fn print_comparison(board: &QuoteBoard) {
    let printed = board.with_comparison(|cmp| {
        println!("Teklif Karşılaştırma: {} sigorta şirketinden teklif alındı", cmp.len());
        println!(
            "En ucuz: {}  |  En hızlı: {}",
            format_try(cmp.cheapest().premium.gross),
            cmp.fastest_seconds()
        );

        for ranked in cmp.ranked() {
            let q = ranked.quote;
            let mut badges = Vec::new();
            if ranked.is_cheapest {
                badges.push("En Ucuz");
            }
            if ranked.is_fastest {
                badges.push("En Hızlı");
            }
            println!(
                "  {:<18} {:>14}  net {}  vergi {}  {}{}",
                display_name(&q.company),
                format_try(q.premium.gross),
                format_try(q.premium.net),
                format_try(q.premium.taxes),
                q.timings.map(|t| format_seconds(t.scrape_ms)).unwrap_or_default(),
                if badges.is_empty() {
                    String::new()
                } else {
                    format!("  [{}]", badges.join(", "))
                }
            );
            for inst in q.installments.iter().take(3).filter(|_| q.installments.len() > 1) {
                println!("      {} Taksit  {}", inst.count, format_try(inst.per_installment));
            }
            for warning in &q.warnings {
                println!("      ⚠️  {}", warning);
            }
        }
    });

    if printed.is_none() {
        println!("Teklif alınamadı");
    }
}
