mod server;

use clap::Args;

#[derive(Args)]
pub struct ServeCommand {
    /// Host interface to bind the server to
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 3000, env = "PORT")]
    pub port: u16,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: String,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub secret_access_key: String,

    /// Single origin allowed for CORS; every origin is allowed when unset
    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Route 53 API endpoint
    #[arg(
        long,
        default_value = "https://route53.amazonaws.com",
        env = "ROUTE53_ENDPOINT"
    )]
    pub endpoint: String,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(server::start_server(self))
    }
}
