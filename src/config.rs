use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_path: PathBuf,
    pub page_size: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let data_path: PathBuf = std::env::var("DATA_PATH")
            .unwrap_or_else(|_| "data/Data1000Movies.csv".to_string())
            .into();

        let page_size: usize =
            std::env::var("PAGE_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(5);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            data_path,
            page_size: page_size.max(1),
        })
    }
}
