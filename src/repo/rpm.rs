use std::collections::BTreeMap;

use super::{RepositoryInfo, SideFile};
use crate::error::{Error, Result};

/// RPM repository builder.
///
/// Only the side files are known; generating the repository metadata is not
/// supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpmRepoCook;

impl RpmRepoCook {
    pub fn side_file_names(&self, file_name: &str) -> Option<BTreeMap<SideFile, String>> {
        Some(BTreeMap::from([(SideFile::Meta, format!("{}.meta", file_name))]))
    }

    pub async fn make_repository(&self, _repo: RepositoryInfo) -> Result<()> {
        Err(Error::NotImplemented("RPM"))
    }
}
