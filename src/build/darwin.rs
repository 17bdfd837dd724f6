//! macOS builds: every flavour, dSYM chosen through `MAKE_DSYM`

use async_trait::async_trait;

use super::{clean_and_make, BuildKind, BuildRequest, Builder, Platform};
use crate::common::Result;

pub struct DarwinBuilder;

#[async_trait]
impl Builder for DarwinBuilder {
    fn platform(&self) -> Platform {
        Platform::MacOS
    }

    async fn build(&self, kind: BuildKind, request: &BuildRequest) -> Result<bool> {
        let dsym = match kind {
            BuildKind::Default => None,
            BuildKind::Dsym => Some("MAKE_DSYM=YES"),
            BuildKind::Dwarf => Some("MAKE_DSYM=NO"),
        };

        clean_and_make(request, request.make_args(dsym)).await?;
        Ok(true)
    }
}
