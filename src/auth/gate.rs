use crate::auth::session::{ActiveSession, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Trafik,
    Kasko,
    Konut,
    Saglik,
    Teklifler,
    Policeler,
    Ayarlar,
    Admin,
    AdminUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(String),
}

const ROUTES: [Route; 11] = [
    Route::Login,
    Route::Dashboard,
    Route::Trafik,
    Route::Kasko,
    Route::Konut,
    Route::Saglik,
    Route::Teklifler,
    Route::Policeler,
    Route::Ayarlar,
    Route::Admin,
    Route::AdminUsers,
];

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Trafik => "/trafik",
            Route::Kasko => "/kasko",
            Route::Konut => "/konut",
            Route::Saglik => "/saglik",
            Route::Teklifler => "/teklifler",
            Route::Policeler => "/policeler",
            Route::Ayarlar => "/ayarlar",
            Route::Admin => "/admin",
            Route::AdminUsers => "/admin/users",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        ROUTES.iter().copied().find(|r| r.path() == trimmed)
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Login => Requirement::Public,
            Route::Admin | Route::AdminUsers => Requirement::Admin,
            _ => Requirement::Authenticated,
        }
    }
}

/// Tek yönlendirme kapısı: rol kontrolü sadece burada yapılır.
pub fn check_access(route: Route, session: Option<&ActiveSession>, login_path: &str) -> Access {
    match (route.requirement(), session) {
        (Requirement::Public, _) => Access::Allow,
        (_, None) => Access::Redirect(login_path.to_string()),
        (Requirement::Admin, Some(s)) if s.role != Role::Admin => {
            tracing::debug!("Admin olmayan kullanıcı {} engellendi", route.path());
            Access::Redirect(Route::Dashboard.path().to_string())
        }
        _ => Access::Allow,
    }
}

/// Kenar çubuğunda gösterilecek sayfalar
pub fn visible_routes(role: Role) -> Vec<Route> {
    ROUTES
        .iter()
        .copied()
        .filter(|r| *r != Route::Login && *r != Route::AdminUsers)
        .filter(|r| r.requirement() != Requirement::Admin || role == Role::Admin)
        .collect()
}
