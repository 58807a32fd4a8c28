use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_portald");
    let mut child = Command::new(exe)
        .env("PORTALD_AUTH_DELAY_MS", "0")
        .env("PORTALD_LOG", "off")
        .env_remove("PORTALD_WORKSPACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn portald");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn error_code(value: &serde_json::Value) -> Option<&str> {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("portald-router-smoke");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["ok"], json!(true));
    assert!(health["result"]["workspacePath"].is_null());

    // Everything stateful needs a workspace first.
    for (i, method) in [
        "session.get",
        "auth.logout",
        "students.list",
        "tasks.list",
        "grades.list",
        "messages.list",
        "dashboard.teacher",
        "data.snapshot",
    ]
    .iter()
    .enumerate()
    {
        let id = format!("pre-{i}");
        let resp = request(&mut stdin, &mut reader, &id, method, json!({}));
        assert_eq!(error_code(&resp), Some("no_workspace"), "{}", method);
    }

    let missing_path = request(&mut stdin, &mut reader, "2", "workspace.select", json!({}));
    assert_eq!(error_code(&missing_path), Some("bad_params"));

    let selected = request(
        &mut stdin,
        &mut reader,
        "3",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    assert_eq!(selected["ok"], json!(true));
    assert!(workspace.join("portal.sqlite3").is_file());

    for (i, method) in [
        "session.get",
        "students.list",
        "tasks.list",
        "grades.list",
        "messages.list",
        "dashboard.teacher",
        "data.snapshot",
    ]
    .iter()
    .enumerate()
    {
        let id = format!("post-{i}");
        let resp = request(&mut stdin, &mut reader, &id, method, json!({}));
        assert_eq!(resp["ok"], json!(true), "{} -> {}", method, resp);
    }

    // No signed-in user and no studentId.
    let dash = request(&mut stdin, &mut reader, "4", "dashboard.student", json!({}));
    assert_eq!(error_code(&dash), Some("bad_params"));

    let bad_day = request(
        &mut stdin,
        &mut reader,
        "5",
        "dashboard.student",
        json!({ "studentId": "1", "today": "July 4th" }),
    );
    assert_eq!(error_code(&bad_day), Some("bad_params"));

    let unknown = request(&mut stdin, &mut reader, "6", "grades.delete", json!({}));
    assert_eq!(error_code(&unknown), Some("not_implemented"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn malformed_line_gets_bad_json_and_loop_continues() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    writeln!(stdin, "{{not json").expect("write");
    stdin.flush().expect("flush");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("json");
    assert_eq!(value["ok"], json!(false));
    assert_eq!(error_code(&value), Some("bad_json"));

    let health = request(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["ok"], json!(true));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn student_dashboard_defaults_to_signed_in_user() {
    let workspace = temp_dir("portald-router-dashboard");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let session = request(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "email": "new.kid@school.org", "password": "pw", "role": "student" }),
    );
    let user_id = session["result"]["user"]["id"].as_str().expect("id").to_string();

    let dash = request(&mut stdin, &mut reader, "3", "dashboard.student", json!({}));
    assert_eq!(dash["ok"], json!(true));
    assert_eq!(dash["result"]["studentId"].as_str(), Some(user_id.as_str()));
    assert_eq!(dash["result"]["taskCount"], json!(0));
    assert!(dash["result"]["averageGrade"].is_null());

    drop(stdin);
    let _ = child.wait();
}
