//! Linux builds: DWARF only, there is no dSYM on this platform

use async_trait::async_trait;

use super::{clean_and_make, BuildKind, BuildRequest, Builder, Platform};
use crate::common::Result;

pub struct LinuxBuilder;

#[async_trait]
impl Builder for LinuxBuilder {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    async fn build(&self, kind: BuildKind, request: &BuildRequest) -> Result<bool> {
        match kind {
            BuildKind::Dsym => Ok(false),
            BuildKind::Default | BuildKind::Dwarf => {
                clean_and_make(request, request.make_args(None)).await?;
                Ok(true)
            }
        }
    }
}
