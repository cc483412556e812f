use std::{error::Error, fmt};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoweringErrorKind {
    InvalidGrid,
    UnsupportedFeature,
    LoweringFailure,
    ConfigurationAmbiguity,
    PlatformNotSupport,
    InvalidParams,
    TypeNotSupport,
}

/// 降级过程中的错误。
///
/// 任何错误都会中止当前调用点的降级，不产生部分结果。
#[derive(Clone, Debug)]
pub struct LoweringError {
    pub kind: LoweringErrorKind,
    pub info: String,
}

impl fmt::Display for LoweringError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.info)
    }
}

impl Error for LoweringError {}

pub(super) mod functions {
    use super::{LoweringError, LoweringErrorKind::*};

    macro_rules! builder {
        ($ty:ident: $name:ident $kind:expr) => {
            #[inline]
            pub fn $name(info: impl Into<String>) -> $ty {
                $ty {
                    kind: $kind,
                    info: info.into(),
                }
            }
        };
    }

    builder!(LoweringError: invalid_grid            InvalidGrid           );
    builder!(LoweringError: unsupported_feature     UnsupportedFeature    );
    builder!(LoweringError: lowering_failure        LoweringFailure       );
    builder!(LoweringError: configuration_ambiguity ConfigurationAmbiguity);
    builder!(LoweringError: platform_not_support    PlatformNotSupport    );
    builder!(LoweringError: invalid_params          InvalidParams         );
    builder!(LoweringError: type_not_support        TypeNotSupport        );
}

#[test]
fn test_display() {
    let e = functions::invalid_grid("grid must have three or fewer dimensions");
    assert_eq!(e.kind, LoweringErrorKind::InvalidGrid);
    assert_eq!(
        e.to_string(),
        "InvalidGrid: grid must have three or fewer dimensions"
    );
}
