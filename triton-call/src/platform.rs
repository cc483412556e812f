use crate::{configuration_ambiguity, platform_not_support, LoweringError};
use std::{fmt, str::FromStr};

/// 降级目标平台。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Platform {
    Cuda,
    Rocm,
}

/// 调优参数缺省值。
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Defaults {
    pub num_warps: i32,
    pub num_stages: i32,
}

// AMD 平台默认不做软件流水。
const DEFAULTS: [(Platform, Defaults); 2] = [
    (
        Platform::Cuda,
        Defaults {
            num_warps: 4,
            num_stages: 3,
        },
    ),
    (
        Platform::Rocm,
        Defaults {
            num_warps: 4,
            num_stages: 1,
        },
    ),
];

impl Platform {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Rocm => "rocm",
        }
    }

    pub fn defaults(self) -> Defaults {
        DEFAULTS
            .iter()
            .find(|(p, _)| *p == self)
            .map(|(_, d)| *d)
            .unwrap_or(DEFAULTS[0].1)
    }

    /// 确定唯一的降级平台。
    ///
    /// 优先使用调用点上的平台列表，为空时退回模块级的平台列表。
    /// 结果必须恰好包含一个平台，不猜测多个平台间的优先级。
    pub fn resolve<S: AsRef<str>>(call_site: &[S], module: &[S]) -> Result<Self, LoweringError> {
        let platforms = if call_site.is_empty() {
            module
        } else {
            call_site
        };
        match platforms {
            [platform] => platform.as_ref().parse(),
            [] => Err(configuration_ambiguity("no active lowering platform")),
            _ => Err(configuration_ambiguity(format!(
                "{} active lowering platforms: {:?}",
                platforms.len(),
                platforms.iter().map(AsRef::as_ref).collect::<Vec<_>>()
            ))),
        }
    }
}

impl FromStr for Platform {
    type Err = LoweringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cuda" => Ok(Self::Cuda),
            "rocm" => Ok(Self::Rocm),
            _ => Err(platform_not_support(format!("unknown platform \"{s}\""))),
        }
    }
}

impl fmt::Display for Platform {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
