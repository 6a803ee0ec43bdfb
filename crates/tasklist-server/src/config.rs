use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tasklist_db::DbConfig;
use tasklist_store::StoreConfig;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "tasklist-server", about = "To-do list API with image attachments")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "TASKLIST_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "TASKLIST_PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file (defaults to the user data directory)
    #[arg(long, env = "TASKLIST_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Directory holding uploaded files, served under /uploads
    #[arg(long, env = "TASKLIST_UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "TASKLIST_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Also delete a task's attachments and their files when the task is deleted
    #[arg(long, env = "TASKLIST_CASCADE_ATTACHMENTS")]
    pub cascade_attachments: bool,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            sqlite_path: self.db_path.clone(),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            uploads_dir: self.uploads_dir.clone(),
        }
    }
}
