use crate::{
    data_types::common::UserId,
    error::{Error, Result},
};

/// The signed-in user, passed explicitly to every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
}

impl Session {
    pub fn new(user_id: impl Into<UserId>) -> Result<Self> {
        let user_id = user_id.into();
        let trimmed = user_id.trim();

        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(Error::invalid(format!("'{}' is not a user id", user_id)));
        }

        Ok(Self {
            user_id: trimmed.to_string(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_path_like_ids() {
        assert!(Session::new("").is_err());
        assert!(Session::new("   ").is_err());
        assert!(Session::new("a/b").is_err());
        assert_eq!(Session::new(" uid-1 ").unwrap().user_id(), "uid-1");
    }
}
