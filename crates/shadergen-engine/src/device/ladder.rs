use std::fmt;

use glutin::context::{ContextApi, ContextAttributes, ContextAttributesBuilder, GlProfile, Version};
use raw_window_handle::RawWindowHandle;

use crate::backend::ContextVersion;
use crate::error::{EngineError, EngineResult};

use super::GlInit;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContextApiKind {
    Gles,
    DesktopGl,
}

/// One rung of the context ladder.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ContextRequest {
    pub api: ContextApiKind,
    pub major: u8,
    pub minor: u8,
    pub tier: ContextVersion,
}

impl ContextRequest {
    const fn new(api: ContextApiKind, major: u8, minor: u8, tier: ContextVersion) -> Self {
        Self { api, major, minor, tier }
    }

    pub(crate) fn attributes(&self, raw_window: Option<RawWindowHandle>) -> ContextAttributes {
        let version = Some(Version::new(self.major, self.minor));
        match self.api {
            ContextApiKind::Gles => ContextAttributesBuilder::new()
                .with_context_api(ContextApi::Gles(version))
                .build(raw_window),
            ContextApiKind::DesktopGl => {
                let builder = ContextAttributesBuilder::new()
                    .with_context_api(ContextApi::OpenGl(version));
                // Compatibility keeps `attribute`/`varying` GLSL accepted on 3.3.
                let builder = if self.major >= 3 {
                    builder.with_profile(GlProfile::Compatibility)
                } else {
                    builder
                };
                builder.build(raw_window)
            }
        }
    }
}

impl fmt::Display for ContextRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.api {
            ContextApiKind::Gles => write!(f, "GLES {}.{}", self.major, self.minor),
            ContextApiKind::DesktopGl if self.major >= 3 => {
                write!(f, "GL {}.{} compatibility", self.major, self.minor)
            }
            ContextApiKind::DesktopGl => write!(f, "GL {}.{}", self.major, self.minor),
        }
    }
}

const MODERN: [ContextRequest; 2] = [
    ContextRequest::new(ContextApiKind::Gles, 3, 0, ContextVersion::Modern),
    ContextRequest::new(ContextApiKind::DesktopGl, 3, 3, ContextVersion::Modern),
];

const LEGACY: [ContextRequest; 2] = [
    ContextRequest::new(ContextApiKind::Gles, 2, 0, ContextVersion::Legacy),
    ContextRequest::new(ContextApiKind::DesktopGl, 2, 1, ContextVersion::Legacy),
];

/// Context requests to try, in order. The first one the platform accepts wins.
pub fn context_ladder(init: &GlInit) -> Vec<ContextRequest> {
    let mut ladder = Vec::with_capacity(MODERN.len() + LEGACY.len());
    if init.allow_modern {
        ladder.extend(MODERN);
    }
    if init.allow_legacy {
        ladder.extend(LEGACY);
    }
    ladder
}

/// Tries each rung of `ladder` with `create` and returns the first accepted one.
///
/// Every rejection is kept for the `ContextUnavailable` reason.
pub(crate) fn walk_ladder<T, E: fmt::Display>(
    ladder: &[ContextRequest],
    mut create: impl FnMut(&ContextRequest) -> Result<T, E>,
) -> EngineResult<(T, ContextRequest)> {
    let mut rejected = Vec::new();

    for request in ladder {
        match create(request) {
            Ok(context) => return Ok((context, *request)),
            Err(e) => {
                log::debug!("{request} context rejected: {e}");
                rejected.push(format!("{request}: {e}"));
            }
        }
    }

    let reason = if rejected.is_empty() {
        "every context tier is disabled".to_string()
    } else {
        rejected.join("; ")
    };
    Err(EngineError::ContextUnavailable { reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_tier_is_tried_first() {
        let ladder = context_ladder(&GlInit::default());
        let tiers: Vec<_> = ladder.iter().map(|r| r.tier).collect();
        assert_eq!(
            tiers,
            [
                ContextVersion::Modern,
                ContextVersion::Modern,
                ContextVersion::Legacy,
                ContextVersion::Legacy
            ]
        );
        assert_eq!(ladder[0].to_string(), "GLES 3.0");
        assert_eq!(ladder[1].to_string(), "GL 3.3 compatibility");
        assert_eq!(ladder[3].to_string(), "GL 2.1");
    }

    #[test]
    fn forced_legacy_skips_modern_tier() {
        let init = GlInit { allow_modern: false, ..GlInit::default() };
        assert!(context_ladder(&init).iter().all(|r| r.tier == ContextVersion::Legacy));
    }

    #[test]
    fn disabling_both_tiers_yields_empty_ladder() {
        let init = GlInit { allow_modern: false, allow_legacy: false, ..GlInit::default() };
        assert!(context_ladder(&init).is_empty());
    }

    #[test]
    fn falls_back_to_legacy_when_modern_rungs_are_rejected() {
        let ladder = context_ladder(&GlInit::default());
        let mut tried = Vec::new();

        let (context, request) = walk_ladder(&ladder, |r| {
            tried.push(*r);
            if r.tier == ContextVersion::Modern {
                Err("unsupported version")
            } else {
                Ok(r.to_string())
            }
        })
        .expect("legacy rung accepted");

        assert_eq!(request.tier, ContextVersion::Legacy);
        assert_eq!(context, "GLES 2.0");
        assert_eq!(tried, ladder[..3]);
    }

    #[test]
    fn exhausted_ladder_lists_every_rejected_rung() {
        let ladder = context_ladder(&GlInit::default());

        let err = walk_ladder(&ladder, |_| Err::<(), _>("no driver")).unwrap_err();

        let EngineError::ContextUnavailable { reason } = &err else {
            panic!("expected ContextUnavailable, got {err:?}");
        };
        for request in &ladder {
            assert!(reason.contains(&format!("{request}: no driver")), "{reason}");
        }
    }

    #[test]
    fn empty_ladder_is_context_unavailable() {
        let init = GlInit { allow_modern: false, allow_legacy: false, ..GlInit::default() };
        let mut attempts = 0;

        let err = walk_ladder(&context_ladder(&init), |_| {
            attempts += 1;
            Ok::<_, &str>(())
        })
        .unwrap_err();

        assert_eq!(attempts, 0);
        assert!(matches!(
            err,
            EngineError::ContextUnavailable { ref reason } if reason == "every context tier is disabled"
        ));
    }
}
