use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

// USDC/ETH 0.05% pool on mainnet.
const DEFAULT_POOL: &str = "0x88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640";
const DEFAULT_POOL_NAME: &str = "usdc-eth-005";
const DEFAULT_DEPLOYMENT_BLOCK: u64 = 12_376_729;
const DEFAULT_CHUNK_SIZE: u64 = 10_000;
const DEFAULT_RPC_URL: &str = "https://rpc.ankr.com/eth";
const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone)]
pub struct Config {
    pub json_rpc_urls: Vec<String>,
    pub pool_address: Address,
    pub pool_name: String,
    pub deployment_block: u64,
    pub chunk_size: u64,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let json_rpc_urls: Vec<String> = std::env::var("JSON_RPC_URLS")
            .unwrap_or_else(|_| DEFAULT_RPC_URL.to_string())
            .split(',')
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        let pool_address_str =
            std::env::var("TARGET_POOL").unwrap_or_else(|_| DEFAULT_POOL.to_string());
        let pool_address =
            Address::from_str(&pool_address_str).context("Invalid TARGET_POOL format")?;

        let pool_name =
            std::env::var("POOL_NAME").unwrap_or_else(|_| DEFAULT_POOL_NAME.to_string());

        let deployment_block = match std::env::var("DEPLOYMENT_BLOCK") {
            Ok(value) => value
                .parse()
                .context("DEPLOYMENT_BLOCK must be a block number")?,
            Err(_) => DEFAULT_DEPLOYMENT_BLOCK,
        };

        let chunk_size = match std::env::var("BLOCK_CHUNK_SIZE") {
            Ok(value) => value
                .parse()
                .context("BLOCK_CHUNK_SIZE must be a block count")?,
            Err(_) => DEFAULT_CHUNK_SIZE,
        };

        let data_dir = PathBuf::from(
            std::env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
        );

        Ok(Config {
            json_rpc_urls,
            pool_address,
            pool_name,
            deployment_block,
            chunk_size,
            data_dir,
        })
    }

    pub fn events_csv_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("univ3-{}-events.csv", self.pool_name))
    }

    pub fn events_json_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("univ3-{}-events.json", self.pool_name))
    }

    pub fn progress_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("univ3-{}-progress.json", self.pool_name))
    }
}
