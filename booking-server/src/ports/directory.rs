use shared::models::{Company, CompanyId, User, UserId};

use super::StoreResult;

/// 公司与用户目录
pub trait DirectoryPort: Send + Sync {
    fn find_company(&self, id: CompanyId) -> StoreResult<Option<Company>>;

    fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;
}
