#[cfg(test)]
#[path = "route_test.rs"]
mod tests;

/// Every page the client can show. Anything that doesn't match a known path
/// lands on `NotFound`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Route {
    Home,
    Dashboard,
    ResumeAnalyzer,
    CareerExplorer,
    LearningPath,
    Profile,
    NotFound,
}

impl Default for Route {
    fn default() -> Route {
        return Route::Home;
    }
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = path
            .split(&['?', '#'][..])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        match path {
            "" => return Route::Home,
            "/dashboard" => return Route::Dashboard,
            "/resume-analyzer" => return Route::ResumeAnalyzer,
            "/career-explorer" => return Route::CareerExplorer,
            "/learning-path" => return Route::LearningPath,
            "/profile" => return Route::Profile,
            _ => return Route::NotFound,
        }
    }

    /// `None` for `NotFound`, which has no canonical path.
    pub fn path(&self) -> Option<&'static str> {
        match self {
            Route::Home => return Some("/"),
            Route::Dashboard => return Some("/dashboard"),
            Route::ResumeAnalyzer => return Some("/resume-analyzer"),
            Route::CareerExplorer => return Some("/career-explorer"),
            Route::LearningPath => return Some("/learning-path"),
            Route::Profile => return Some("/profile"),
            Route::NotFound => return None,
        }
    }
}

/// A named entry in the navigation bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Destination {
    Dashboard,
    Careers,
    LearningPath,
    Profile,
    GetStarted,
}

impl Destination {
    pub fn title(&self) -> &'static str {
        match self {
            Destination::Dashboard => return "Dashboard",
            Destination::Careers => return "Careers",
            Destination::LearningPath => return "Learning Path",
            Destination::Profile => return "Profile",
            Destination::GetStarted => return "Get Started",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Destination::Dashboard => return "/dashboard",
            Destination::Careers => return "/career-explorer",
            Destination::LearningPath => return "/learning-path",
            Destination::Profile => return "/profile",
            Destination::GetStarted => return "/resume-analyzer",
        }
    }
}
