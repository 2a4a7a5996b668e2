use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Buried-volume analysis server", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "BVOL_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Directory holding rendered steric maps; stale maps are purged at startup
    #[arg(long, env = "BVOL_PLOTS_DIR", default_value = "plots")]
    pub plots_dir: PathBuf,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "BVOL_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}
