//! User-visible placeholder results.
//!
//! These strings are part of the external contract: clients match on them
//! verbatim, so they must not be reworded.

use hirelens_core::AnalysisResult;

pub const IN_PROGRESS: &str = "현재 분석이 진행 중입니다. 잠시만 기다려주세요.";
pub const COOLING_DOWN: &str = "최근 분석 시도에 실패했습니다. 잠시 후 다시 시도해주세요.";
pub const MALFORMED: &str = "응답 형식이 올바르지 않습니다. 다시 시도해주세요.";

pub const EMPTY_REQUIREMENTS: &str = "요구사항 분석 결과가 비어 있습니다. 다시 시도해주세요.";
pub const EMPTY_PREFERENCES: &str = "우대사항 분석 결과가 비어 있습니다. 다시 시도해주세요.";

pub const FAILED_REQUIREMENTS: &str = "요구사항 분석에 실패했습니다.";
pub const FAILED_PREFERENCES: &str = "우대사항 분석에 실패했습니다.";

pub const UNEXPECTED_REQUIREMENTS: &str = "요구사항을 불러오는 중 오류가 발생했습니다.";
pub const UNEXPECTED_PREFERENCES: &str = "우대사항을 불러오는 중 오류가 발생했습니다.";

/// Another caller already has an analysis running for this job.
pub fn in_progress() -> AnalysisResult {
    AnalysisResult::uniform(IN_PROGRESS)
}

/// A hard failure happened within the cooldown window.
pub fn cooling_down() -> AnalysisResult {
    AnalysisResult::uniform(COOLING_DOWN)
}

/// The backend call itself failed (timeout, transport, non-2xx).
pub fn hard_failure() -> AnalysisResult {
    AnalysisResult::pair(FAILED_REQUIREMENTS, FAILED_PREFERENCES)
}

/// The coordinator hit an internal error.
pub fn unexpected_failure() -> AnalysisResult {
    AnalysisResult::pair(UNEXPECTED_REQUIREMENTS, UNEXPECTED_PREFERENCES)
}
