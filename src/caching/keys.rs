//! 캐시 키 파생 규칙
//!
//! 모든 키와 패턴은 소문자입니다. 같은 리소스 계열의 키는 모두
//! 해당 무효화 패턴(`*address*`, `*doctor*`, `*user*`)과 일치해야 합니다.

use std::time::Duration;

use crate::config::{
    ADDRESS_CACHING_TIME, DOCTOR_CACHING_TIME, GRPC_LIST_CACHING_TIME, USERS_CACHING_TIME,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Address,
    Doctor,
    User,
}

impl ResourceKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ResourceKind::Address => "address",
            ResourceKind::Doctor => "doctor",
            ResourceKind::User => "user",
        }
    }

    /// 쓰기 후 삭제할 glob 패턴
    pub fn pattern(&self) -> &'static str {
        match self {
            ResourceKind::Address => "*address*",
            ResourceKind::Doctor => "*doctor*",
            ResourceKind::User => "*user*",
        }
    }

    /// 단건 및 HTTP 목록 TTL
    pub fn ttl(&self) -> Duration {
        match self {
            ResourceKind::Address => ADDRESS_CACHING_TIME,
            ResourceKind::Doctor => DOCTOR_CACHING_TIME,
            ResourceKind::User => USERS_CACHING_TIME,
        }
    }

    /// gRPC 필터 없는 목록 키
    pub fn list_literal(&self) -> &'static str {
        match self {
            ResourceKind::Address => "addresses_list",
            ResourceKind::Doctor => "doctors_list",
            ResourceKind::User => "users_list",
        }
    }

    /// 단건 키: `<resource>_<id>`
    pub fn entity_key(&self, id: &str) -> String {
        format!("{}_{}", self.prefix(), id).to_lowercase()
    }

    /// HTTP 목록 키: 쿼리 문자열을 포함한 요청 URI 전체
    pub fn http_list_key(&self, request_uri: &str) -> String {
        request_uri.to_lowercase()
    }

    /// gRPC 목록 키와 TTL
    ///
    /// 필터가 없으면 고정 리터럴과 긴 TTL을, 있으면 리터럴 뒤에
    /// `name=value` 쌍을 `&`로 이어 붙인 키와 기본 TTL을 반환합니다.
    /// 빈 값은 필터로 보지 않습니다.
    pub fn grpc_list_key(&self, params: &[(&str, String)]) -> (String, Duration) {
        let filters: Vec<String> = params
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        if filters.is_empty() {
            (self.list_literal().to_string(), GRPC_LIST_CACHING_TIME)
        } else {
            (
                format!("{}:{}", self.list_literal(), filters.join("&")).to_lowercase(),
                self.ttl(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caching::glob_match;

    #[test]
    fn test_entity_keys_match_their_pattern() {
        for kind in [ResourceKind::Address, ResourceKind::Doctor, ResourceKind::User] {
            let key = kind.entity_key("0F8FAD5B-D9CB-469F-A165-70867728950E");
            assert!(glob_match(kind.pattern(), &key));
            assert_eq!(key, key.to_lowercase());
        }
    }

    #[test]
    fn test_http_list_keys_match_their_pattern() {
        let key = ResourceKind::Doctor.http_list_key("/api/v1/doctor/list_doctors?search=Kim&page=2");
        assert_eq!(key, "/api/v1/doctor/list_doctors?search=kim&page=2");
        assert!(glob_match("*doctor*", &key));

        let key = ResourceKind::User.http_list_key("/auth-admin/users?page=1");
        assert!(glob_match("*user*", &key));
    }

    #[test]
    fn test_grpc_list_key_without_filters_uses_literal() {
        let (key, ttl) = ResourceKind::Address.grpc_list_key(&[
            ("name", String::new()),
            ("page", String::new()),
        ]);
        assert_eq!(key, "addresses_list");
        assert_eq!(ttl, GRPC_LIST_CACHING_TIME);
        assert!(glob_match("*address*", &key));
    }

    #[test]
    fn test_grpc_list_key_with_filters_is_canonical() {
        let (key, ttl) = ResourceKind::Doctor.grpc_list_key(&[
            ("search", "Cardio".to_string()),
            ("page", "2".to_string()),
            ("limit", String::new()),
        ]);
        assert_eq!(key, "doctors_list:search=cardio&page=2");
        assert_eq!(ttl, DOCTOR_CACHING_TIME);
        assert!(glob_match("*doctor*", &key));
    }
}
