//! Backend health probe

use super::with_spinner;
use crate::clients::HttpBackend;
use anyhow::Result;
use colored::Colorize;

/// Probe the remote backend, or report the in-process one as healthy
///
/// # Errors
///
/// Returns an error if the service is unreachable or reports not ok.
pub async fn run_health(backend: Option<&HttpBackend>) -> Result<()> {
    let Some(backend) = backend else {
        println!("{} local backend", "✓".bright_green());
        return Ok(());
    };

    let url = backend.base_url().to_string();
    with_spinner(&format!("Checking {url}..."), backend.health()).await?;
    println!("{} {url}", "✓".bright_green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn local_backend_is_always_healthy() {
        assert!(run_health(None).await.is_ok());
    }

    #[tokio::test]
    async fn unhealthy_service_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(Url::parse(&server.uri()).unwrap());
        assert!(run_health(Some(&backend)).await.is_err());
    }
}
