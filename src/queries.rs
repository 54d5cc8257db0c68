//! Fixed GraphQL documents sent to the backend

pub const ME: &str = "query { user { id login firstName lastName email } }";

pub const XP_TRANSACTIONS: &str = r#"
query MyXp($limit: Int = 1000) {
  transaction(
    where: { type: { _eq: "xp" } }
    order_by: { createdAt: asc }
    limit: $limit
  ) { id amount objectId userId createdAt path }
}
"#;

pub const OBJECT_BY_IDS: &str = r#"
query ObjByIds($ids: [Int!]) {
  object(where: { id: { _in: $ids } }) { id name type }
}
"#;

pub const PROGRESS: &str = r#"
query MyProgress($limit: Int = 2000, $userId: Int!) {
  progress(
    order_by: [{ updatedAt: desc }, { createdAt: desc }]
    limit: $limit
    where: { userId: { _eq: $userId }, isDone: { _eq: true } }
  ) {
    id
    grade
    createdAt
    updatedAt
    path
    objectId
    object { id name type }
    user { id login }
  }
}
"#;
