use crate::domain::entities::UserRole;

/// 라우트가 요구하는 역할
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequiredRole(pub UserRole);

impl RequiredRole {
    pub fn is_satisfied(&self, role: UserRole) -> bool {
        self.0 == role
    }
}
