pub type DocumentId = String;
pub type UserId = String;
pub type MatchId = String;
pub type DrillId = String;

pub trait Identifiable {
    fn as_id(&self) -> &str;
}
