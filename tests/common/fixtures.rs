//! Source fixtures

/// One block with two marked test functions
pub const WIDGET: &str = r#"use crate::state::Market;

pub struct Widget {
    pub size: u64,
}

impl Widget {
    pub fn grow(&mut self) {
        self.size += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows() {
        let mut w = Widget { size: 1 };
        w.grow();
        assert_eq!(w.size, 2);
    }

    #[test]
    fn starts_small() {
        let w = Widget { size: 0 };
        assert_eq!(w.size, 0);
    }
}
"#;

pub const WIDGET_SOURCE_AFTER: &str = r#"use crate::state::Market;

pub struct Widget {
    pub size: u64,
}

impl Widget {
    pub fn grow(&mut self) {
        self.size += 1;
    }
}
"#;

pub const WIDGET_TESTS: &str = r#"use demo::feature::widget::*;
use solana_program::clock::Clock;
use solana_program::program_error::ProgramError;
use solana_program::pubkey::Pubkey;

#[test]
fn grows() {
    let mut w = Widget { size: 1 };
    w.grow();
    assert_eq!(w.size, 2);
}

#[test]
fn starts_small() {
    let w = Widget { size: 0 };
    assert_eq!(w.size, 0);
}
"#;

/// Marker present, but the test module is outside the lookahead window
pub const MARKER_WITHOUT_CONTAINER: &str = r#"pub fn fee(amount: u64) -> u64 {
    amount / 100
}

#[cfg(test)]
#[allow(unused_imports)]
#[allow(dead_code)]
mod tests {
    #[test]
    fn fee_is_one_percent() {
        assert_eq!(super::fee(1000), 10);
    }
}
"#;

/// Test block cut off before its closing brace
pub const UNTERMINATED: &str = r#"pub fn margin(x: u64) -> u64 {
    x * 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triples() {
        assert_eq!(margin(2), 6);
    }
"#;

/// Helpers, a nested `use`, braces in strings and a should_panic test
pub const MATH_UTILS: &str = r#"use fixed::types::U64F64;

pub struct MathUtils;

impl MathUtils {
    pub fn percentage_bps(value: U64F64, bps: u64) -> Option<U64F64> {
        value.checked_mul(U64F64::from_num(bps))?.checked_div(U64F64::from_num(10_000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BettingPlatformError;

    const ONE_THOUSAND: u64 = 1000;

    fn fixed(n: u64) -> U64F64 {
        U64F64::from_num(n)
    }

    #[test]
    fn test_percentage_calculation() {
        let result = MathUtils::percentage_bps(fixed(ONE_THOUSAND), 250).unwrap();
        assert_eq!(result.to_num::<u64>(), 25, "expected {{25}} got }}");
    }

    #[test]
    #[should_panic(expected = "overflow {")]
    fn test_overflow_panics() {
        let _ = fixed(u64::MAX) * fixed(u64::MAX);
        panic!("overflow {{");
    }
}
"#;

/// CRLF line endings and no trailing newline
pub const CRLF_SOURCE: &str = "pub fn one() -> u8 {\r\n    1\r\n}\r\n\r\n#[cfg(test)]\r\nmod tests {\r\n    #[test]\r\n    fn is_one() {\r\n        assert_eq!(super::one(), 1);\r\n    }\r\n}";
