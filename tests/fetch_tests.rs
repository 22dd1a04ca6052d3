use assert_fs::prelude::*;
use predicates::prelude::*;
use std::collections::HashMap;
use std::fs;
use tokio::task;
use warp::Filter;

fn write_api_config(socket_addr: std::net::SocketAddr, extra: &str) -> assert_fs::NamedTempFile {
    let config_yaml = format!("base_url: http://{socket_addr}/\n{extra}");
    let config_file = assert_fs::NamedTempFile::new("api.yaml").unwrap();
    config_file.write_str(&config_yaml).unwrap();
    config_file
}

fn monthly_rows() -> serde_json::Value {
    serde_json::json!([
        {"month": "Jan", "new_patients": 180, "lost_patients": 100,
         "production_general": 250000, "production_ortho": 90000,
         "collections_general": 230000, "collections_ortho": 85000},
        {"month": "Feb", "new_patients": "50", "lost_patients": "80",
         "production_general": "NaN", "collections_general": 1200}
    ])
}

async fn run_fetch(
    socket_addr: std::net::SocketAddr,
    config_extra: &str,
    location: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let config_file = write_api_config(socket_addr, config_extra);
    let output_file = assert_fs::NamedTempFile::new("report.json").unwrap();
    let output_path = output_file.path();

    let config_arg = config_file.path().to_str().unwrap().to_string();
    let output_arg = output_path.to_str().unwrap().to_string();
    let location_arg = location.to_string();
    task::spawn_blocking(move || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("clinic-kpis");
        cmd.args([
            "fetch", "-c", &config_arg, "-l", &location_arg, "-o", &output_arg, "-f", "json",
        ]);

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("KPI report written to"));
    })
    .await?;

    Ok(fs::read_to_string(output_path)?)
}

#[tokio::test]
async fn fetch_monthly_rows_by_query_id() {
    let rows = monthly_rows();
    let route = warp::path("reports")
        .and(warp::path("monthly-kpi"))
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .map(move |params: HashMap<String, String>| {
            if params.get("id").map(String::as_str) == Some("LOC 1") {
                warp::reply::json(&rows)
            } else {
                warp::reply::json(&serde_json::json!([]))
            }
        });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let output = run_fetch(addr, "", "LOC 1").await.unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["source"], "location LOC 1");
    assert_eq!(report["periods"], serde_json::json!(["Jan", "Feb"]));
    assert_eq!(report["kpis"]["series"]["collectionRatioPct"], serde_json::json!([93, 0]));
    assert_eq!(report["kpis"]["latest"]["netPatientGrowth"], -30.0);
    assert_eq!(report["kpis"]["latest"]["productionGeneral"], 0.0);
}

#[tokio::test]
async fn fetch_monthly_rows_by_path_id_with_rows_wrapper() {
    let rows = monthly_rows();
    let route = warp::path("kpi")
        .and(warp::path("id:LOC-2"))
        .and(warp::get())
        .map(move || warp::reply::json(&serde_json::json!({"status": "success", "rows": rows})));
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let output = run_fetch(addr, "monthly_path: /kpi\nid_style: path\n", "LOC-2")
        .await
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["periods"], serde_json::json!(["Jan", "Feb"]));
    assert_eq!(report["kpis"]["series"]["productionTotal"][0], 340000.0);
}

#[tokio::test]
async fn fetch_reports_missing_location() {
    let route = warp::path("reports").and(warp::path("monthly-kpi")).map(|| {
        warp::reply::with_status("missing", warp::http::StatusCode::NOT_FOUND)
    });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let config_file = write_api_config(addr, "");
    let config_arg = config_file.path().to_str().unwrap().to_string();
    let output_dir = assert_fs::TempDir::new().unwrap();
    let output_arg = output_dir.child("report.yaml").path().to_str().unwrap().to_string();

    task::spawn_blocking(move || {
        let mut cmd = assert_cmd::cargo_bin_cmd!("clinic-kpis");
        cmd.args(["fetch", "-c", &config_arg, "-l", "NOPE", "-o", &output_arg]);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("resource not found"));
    })
    .await
    .unwrap();
}
