use std::sync::Arc;

use color_eyre::eyre;

use scrmbld_config::Config;
use scrmbld_service::ScrmbldService;
use scrmbld_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ScrmbldService>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let postgres = storage_config(&config)?;
		let db = Db::connect(postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(ScrmbldService::new(config, db)))
	}

	/// Builds state over a pool that connects on first use. Schema setup is skipped.
	pub fn lazy(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect_lazy(storage_config(&config)?)?;

		Ok(Self::from_service(ScrmbldService::new(config, db)))
	}

	pub fn from_service(service: ScrmbldService) -> Self {
		Self { service: Arc::new(service) }
	}
}

fn storage_config(config: &Config) -> color_eyre::Result<&scrmbld_config::Postgres> {
	config
		.storage
		.as_ref()
		.map(|storage| &storage.postgres)
		.ok_or_else(|| eyre::eyre!("storage.postgres is not configured."))
}
