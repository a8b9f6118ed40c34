pub mod api;

use crate::cli::ServeArgs;
use crate::llm::chat::ChatClient;
use api::TlsPaths;
use log::{ error, info };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct Server {
    client: Arc<dyn ChatClient>,
    args: ServeArgs,
}

impl Server {
    pub fn new(client: Arc<dyn ChatClient>, args: ServeArgs) -> Self {
        Self { client, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = resolve_bind_addr(&self.args.host, self.args.port).await?;
        let tls = self.tls_paths()?;
        info!("Starting relay for model {} on {}", self.client.get_model(), addr);

        api::start_http_server(addr, self.client.clone(), tls).await
    }

    fn tls_paths(&self) -> Result<Option<TlsPaths>, Box<dyn Error + Send + Sync>> {
        if !self.args.enable_tls {
            info!("TLS not enabled. Serving plain HTTP.");
            return Ok(None);
        }

        match (&self.args.tls_cert_path, &self.args.tls_key_path) {
            (Some(cert_path), Some(key_path)) => {
                info!(
                    "TLS enabled. Loading certificate from '{}' and key from '{}'",
                    cert_path,
                    key_path
                );
                Ok(Some(TlsPaths { cert_path: cert_path.clone(), key_path: key_path.clone() }))
            }
            (Some(_), None) | (None, Some(_)) => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                Err("Missing TLS certificate or key path".into())
            }
            (None, None) => {
                error!("--enable-tls was set but no certificate/key paths provided.");
                Err("TLS enabled without cert/key".into())
            }
        }
    }
}

/// Resolves `HOST`/`PORT` into the address to bind. Accepts hostnames and bare
/// IPv6 literals such as `::`.
pub async fn resolve_bind_addr(host: &str, port: u16) -> Result<SocketAddr, Box<dyn Error + Send + Sync>> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    tokio::net::lookup_host((host, port)).await
        .map_err(|e| format!("Invalid listen host '{}': {}", host, e))?
        .next()
        .ok_or_else(|| format!("Listen host '{}' resolved to no addresses", host).into())
}
