use serde::{Deserialize, Serialize};

/// 시간 단위. 채수 시간(경과 시간) 입력에 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeUnit {
    #[default]
    Second,
    Minute,
}

impl TimeUnit {
    /// mL/[단위] 를 L/h 로 바꾸는 계수.
    ///
    /// 초 기준 3.6 (3600 / 1000), 분 기준 0.06 (60 / 1000).
    pub fn flow_factor(self) -> f64 {
        match self {
            TimeUnit::Second => 3.6,
            TimeUnit::Minute => 0.06,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "min",
        }
    }
}
