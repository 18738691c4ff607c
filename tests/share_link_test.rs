//! Shareable links
//!
//! The link copied from a station modal must reopen the same station with
//! the same display name, including names that need escaping.

use std::rc::Rc;

use kelitui::logic::cluster::ClusterConfig;
use kelitui::messages::Cmd;
use kelitui::prefs::PreferenceStore;
use kelitui::route::Route;
use kelitui::session::{Session, SessionOptions};

fn session() -> Session {
    let store = Rc::new(PreferenceStore::new_in_memory().expect("in-memory store"));
    Session::new(
        store,
        SessionOptions {
            vim_mode: false,
            cluster: ClusterConfig::default(),
            share_base: "https://keli.example/".to_string(),
        },
    )
}

#[test]
fn test_copied_link_reopens_station() {
    let mut s = session();
    let route = Route::station("C01503", "Vt4 Oulu & Kempele");
    s.navigate(route.clone());

    let cmds = s.copy_link();
    let text = match cmds.as_slice() {
        [Cmd::CopyToClipboard { text }] => text.clone(),
        other => panic!("unexpected commands {:?}", other),
    };
    assert!(text.starts_with("https://keli.example/?id=C01503&name="));
    assert!(!text.contains(' '));
    assert_eq!(Route::parse(&text), route);
}

#[test]
fn test_no_copy_without_modal() {
    let mut s = session();
    assert!(s.copy_link().is_empty());
    assert_eq!(s.share_link(), "https://keli.example/");
}

#[test]
fn test_copy_result_marks_modal() {
    let mut s = session();
    s.navigate(Route::station("C01503", "Oulu"));
    let now = std::time::Instant::now();

    s.copy_finished(Ok(()), now);
    assert!(s.model.modal().unwrap().is_copied(now));

    s.copy_finished(Err("no clipboard".to_string()), now);
    assert_eq!(
        s.model.ui.toast_message.as_ref().map(|(m, _)| m.as_str()),
        Some("Error: no clipboard")
    );
}
