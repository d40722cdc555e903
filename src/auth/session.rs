use crate::auth::store::{SessionError, SessionStore, StoredSession};
use crate::http::{UpdateProfileRequest, User};
use crate::utils::mask_sensitive;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Standard,
}

impl Role {
    pub fn from_claim(role: &str) -> Self {
        if role.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Standard
        }
    }
}

/// Sayfa yönlendirmesini yapan taraf (UI router).
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Yönlendirmeyi sadece loglar; CLI bunu kullanır.
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, path: &str) {
        tracing::info!("↪️  Yönlendirme: {}", path);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub token: String,
    pub user: User,
    pub role: Role,
}

impl ActiveSession {
    fn new(token: String, user: User) -> Self {
        let role = Role::from_claim(&user.role);
        Self { token, user, role }
    }
}

/// Bearer token ve kullanıcı bilgisini tutar. Store'dan bir kez yüklenir;
/// yalnızca `login`, `logout`, `update_profile` ve `expire` ile değişir.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    state: RwLock<Option<ActiveSession>>,
}

impl SessionManager {
    pub fn hydrate(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        let state = match store.load() {
            Ok(Some(stored)) => {
                tracing::info!("✅ Oturum yüklendi: {}", stored.user.email);
                Some(ActiveSession::new(stored.token, stored.user))
            }
            Ok(None) => None,
            Err(SessionError::Corrupt(e)) => {
                tracing::warn!("⚠️ Kayıtlı oturum bozuk, siliniyor: {}", e);
                if let Err(e) = store.clear() {
                    tracing::error!("❌ Oturum silinemedi: {}", e);
                }
                None
            }
            Err(e) => {
                tracing::warn!("⚠️ Oturum yüklenemedi: {}", e);
                None
            }
        };

        Self {
            store,
            navigator,
            login_path: login_path.into(),
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<ActiveSession>> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<ActiveSession>> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }

    pub fn login(&self, token: String, user: User) -> Result<(), SessionError> {
        tracing::info!(
            "🔐 Giriş yapıldı: {} (token: {})",
            user.email,
            mask_sensitive(&token)
        );

        let session = ActiveSession::new(token, user);
        *self.write() = Some(session.clone());

        self.store.save(&StoredSession {
            token: session.token,
            user: session.user,
        })
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.teardown();
        tracing::info!("👋 Çıkış yapıldı");
        self.navigator.redirect(&self.login_path);
        Ok(())
    }

    /// Sunucunun kabul ettiği profil alanlarını önbellekteki kullanıcıya işler.
    pub fn update_profile(&self, patch: &UpdateProfileRequest) -> Result<(), SessionError> {
        let updated = {
            let mut guard = self.write();
            let Some(session) = guard.as_mut() else {
                return Ok(());
            };

            if let Some(name) = &patch.name {
                session.user.name = name.clone();
            }
            if let Some(phone) = &patch.phone {
                session.user.phone = Some(phone.clone());
            }
            session.clone()
        };

        self.store.save(&StoredSession {
            token: updated.token,
            user: updated.user,
        })
    }

    /// 401 sonrası: token ve kullanıcıyı sil, login sayfasına gönder.
    pub fn expire(&self) {
        if self.teardown() {
            tracing::warn!("⏰ Oturum süresi doldu, login sayfasına yönlendiriliyor");
        }
        self.navigator.redirect(&self.login_path);
    }

    fn teardown(&self) -> bool {
        let had_session = self.write().take().is_some();
        if let Err(e) = self.store.clear() {
            tracing::error!("❌ Oturum silinemedi: {}", e);
        }
        had_session
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.read().as_ref().map(|s| s.role)
    }

    pub fn snapshot(&self) -> Option<ActiveSession> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}
