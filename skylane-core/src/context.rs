/// Identity of the authenticated caller for one request.
///
/// Built exactly once at the HTTP boundary (from verified JWT claims) and
/// passed explicitly through the call chain. Nothing below the boundary
/// reads ambient per-thread state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: i64,
}

impl RequestContext {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}
