use std::path::PathBuf;

use crate::{config::DEFAULT_BASE_URL, db::caiso::renewables_watch::CaisoRenewablesWatchArchive};

pub struct ProdDb {}

impl ProdDb {
    pub fn caiso_renewables_watch() -> CaisoRenewablesWatchArchive {
        CaisoRenewablesWatchArchive {
            base_url: DEFAULT_BASE_URL.to_string(),
            out_dir: PathBuf::from("data"),
        }
    }
}
