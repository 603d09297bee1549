use serde_json::json;
use std::fs;
use tempfile::TempDir;

use mail_launcher::channel::{MethodCall, MethodResult, handle_call};
use mail_launcher::domain::intent::LaunchRequest;
use mail_launcher::launcher::DryRunLauncher;
use mail_launcher::registry::desktop::DesktopRegistry;
use mail_launcher::service::MailApps;

fn applications() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("evolution.desktop"),
        "[Desktop Entry]\nType=Application\nName=Evolution\nExec=evolution %U\nMimeType=x-scheme-handler/mailto;\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("thunderbird.desktop"),
        "[Desktop Entry]\nType=Application\nName=Thunderbird\nExec=thunderbird %u\nMimeType=x-scheme-handler/mailto;\n",
    )
    .unwrap();
    dir
}

fn call(v: serde_json::Value) -> MethodCall {
    serde_json::from_value(v).unwrap()
}

#[test]
fn desktop_entries_flow_through_the_channel() {
    let dir = applications();
    let reg = DesktopRegistry::new(vec![dir.path().into()]);
    let l = DryRunLauncher::quiet();
    let apps = MailApps::new(&reg, &l);

    assert_eq!(
        handle_call(&apps, &call(json!({"method": "getMainApps"}))),
        MethodResult::Success {
            value: json!(r#"[{"name":"Evolution"},{"name":"Thunderbird"}]"#)
        }
    );

    let r = handle_call(
        &apps,
        &call(json!({
            "method": "openMailApp",
            "arguments": {"nativePickerTitle": "Mail"}
        })),
    );
    assert_eq!(r, MethodResult::Success { value: json!(true) });

    let r = handle_call(
        &apps,
        &call(json!({
            "method": "composeNewEmailInSpecificMailApp",
            "arguments": {
                "name": "Thunderbird",
                "emailContent": {"to": ["a@x.com"], "subject": "S", "body": "B"}
            }
        })),
    );
    assert_eq!(r, MethodResult::Success { value: json!(true) });

    let started = l.started();
    assert_eq!(started.len(), 2);
    let LaunchRequest::Chooser(c) = &started[0] else {
        panic!("expected a chooser");
    };
    assert_eq!(c.title, "Mail");
    assert_eq!(c.primary.target.as_ref().unwrap().package, "evolution.desktop");

    let LaunchRequest::Direct(d) = &started[1] else {
        panic!("expected a direct launch");
    };
    let target = d.target.as_ref().unwrap();
    assert_eq!(target.package, "thunderbird.desktop");
    assert_eq!(target.entry_point.as_deref(), Some("thunderbird %u"));
}

#[test]
fn newly_installed_apps_show_up_without_restart() {
    let dir = applications();
    let reg = DesktopRegistry::new(vec![dir.path().into()]);
    let l = DryRunLauncher::quiet();
    let apps = MailApps::new(&reg, &l);
    let get = || handle_call(&apps, &MethodCall::new("getMainApps"));

    let before = get();
    fs::write(
        dir.path().join("geary.desktop"),
        "[Desktop Entry]\nName=Geary\nExec=geary %U\nMimeType=x-scheme-handler/mailto;\n",
    )
    .unwrap();
    let after = get();

    assert_ne!(before, after);
    assert_eq!(
        after,
        MethodResult::Success {
            value: json!(r#"[{"name":"Evolution"},{"name":"Geary"},{"name":"Thunderbird"}]"#)
        }
    );
}
