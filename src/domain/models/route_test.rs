use strum::IntoEnumIterator;

use super::Destination;
use super::Route;

#[test]
fn it_parses_known_paths() {
    assert_eq!(Route::parse("/"), Route::Home);
    assert_eq!(Route::parse(""), Route::Home);
    assert_eq!(Route::parse("/dashboard"), Route::Dashboard);
    assert_eq!(Route::parse("/resume-analyzer"), Route::ResumeAnalyzer);
    assert_eq!(Route::parse("/career-explorer"), Route::CareerExplorer);
    assert_eq!(Route::parse("/learning-path"), Route::LearningPath);
    assert_eq!(Route::parse("/profile"), Route::Profile);
}

#[test]
fn it_ignores_trailing_slash_query_and_fragment() {
    assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
    assert_eq!(Route::parse("/profile?tab=goals"), Route::Profile);
    assert_eq!(Route::parse("/learning-path#python"), Route::LearningPath);
    assert_eq!(Route::parse("/?ref=header"), Route::Home);
}

#[test]
fn it_falls_back_to_not_found() {
    assert_eq!(Route::parse("/admin"), Route::NotFound);
    assert_eq!(Route::parse("/dashboard/extra"), Route::NotFound);
    assert_eq!(Route::parse("dashboard"), Route::NotFound);
    assert_eq!(Route::parse("/DASHBOARD"), Route::NotFound);
}

#[test]
fn it_round_trips_route_paths() {
    for route in [
        Route::Home,
        Route::Dashboard,
        Route::ResumeAnalyzer,
        Route::CareerExplorer,
        Route::LearningPath,
        Route::Profile,
    ] {
        assert_eq!(Route::parse(route.path().unwrap()), route);
    }

    assert_eq!(Route::NotFound.path(), None);
}

#[test]
fn it_routes_every_destination_to_a_page() {
    for destination in Destination::iter() {
        assert_ne!(Route::parse(destination.path()), Route::NotFound);
    }

    assert_eq!(
        Route::parse(Destination::GetStarted.path()),
        Route::ResumeAnalyzer
    );
    assert_eq!(Destination::LearningPath.title(), "Learning Path");
}
