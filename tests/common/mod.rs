use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;

/// Secret the spawned server signs with; tests forge tokens against it.
pub const JWT_SECRET: &str = "integration-test-signing-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // CARGO_BIN_EXE points at the binary cargo built for this test run,
        // so release-profile runs work too
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_roster-api"));
        cmd.env("ROSTER_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("SECURITY_JWT_SECRET", JWT_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Register an account and return its id.
#[allow(dead_code)]
pub async fn register(client: &reqwest::Client, base_url: &str, email: &str) -> Result<String> {
    let res = client
        .post(format!("{}/users", base_url))
        .json(&json!({
            "email": email,
            "password": "hunter22",
            "firstName": "Test",
            "lastName": "User"
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    Ok(body["data"]["id"].as_str().context("missing id")?.to_string())
}

/// Log in and return the bearer token.
#[allow(dead_code)]
pub async fn login(client: &reqwest::Client, base_url: &str, email: &str) -> Result<String> {
    let res = client
        .post(format!("{}/auth", base_url))
        .json(&json!({ "email": email, "password": "hunter22" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "login failed: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    Ok(body["data"]["token"].as_str().context("missing token")?.to_string())
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
