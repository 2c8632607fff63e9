use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDateTime};
use serde::de::DeserializeOwned;

use helpmap_types::api::{CreateHelpRequest, CreateReviewRequest, CreateTopicRequest, SendMessageRequest};
use helpmap_types::models::{
    DEFAULT_FORUM_CATEGORY, DEFAULT_HELP_CATEGORY, ForumTopic, HELP_REQUEST_OPEN, HelpRequest,
    Message, Review, UNKNOWN_NAME,
};

use crate::models::{Record, UserRow};
use crate::{Collection, Store};

impl Store {
    // -- Users --

    /// Append a user. Returns `None` if the username is already taken.
    pub fn create_user(&self, username: &str, password_hash: &str, role: &str) -> Result<Option<UserRow>> {
        self.update(Collection::Users, |users: &mut Vec<UserRow>| {
            if users.iter().any(|u| u.username == username) {
                return None;
            }

            let user = UserRow {
                id: next_id(users),
                username: username.to_string(),
                password: password_hash.to_string(),
                role: role.to_string(),
                created_at: now(),
            };
            users.push(user.clone());
            Some(user)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        let users: Vec<UserRow> = self.read(Collection::Users)?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    pub fn get_user_by_id(&self, id: u64) -> Result<Option<UserRow>> {
        self.find(Collection::Users, id)
    }

    // -- Help requests --

    pub fn list_help_requests(&self) -> Result<Vec<HelpRequest>> {
        self.read(Collection::HelpRequests)
    }

    pub fn get_help_request(&self, id: u64) -> Result<Option<HelpRequest>> {
        self.find(Collection::HelpRequests, id)
    }

    pub fn insert_help_request(&self, req: CreateHelpRequest) -> Result<HelpRequest> {
        self.append(Collection::HelpRequests, |id| HelpRequest {
            id,
            creator_id: req.creator_id,
            creator: req.creator.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            title: req.title,
            description: req.description,
            category: req.category.unwrap_or_else(|| DEFAULT_HELP_CATEGORY.to_string()),
            status: HELP_REQUEST_OPEN.to_string(),
            created_at: now(),
        })
    }

    // -- Messages --

    pub fn list_messages(&self) -> Result<Vec<Message>> {
        self.read(Collection::Messages)
    }

    pub fn get_message(&self, id: u64) -> Result<Option<Message>> {
        self.find(Collection::Messages, id)
    }

    pub fn insert_message(&self, req: SendMessageRequest) -> Result<Message> {
        self.append(Collection::Messages, |id| Message {
            id,
            sender_id: req.sender_id,
            sender: req.sender.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            receiver_id: req.receiver_id,
            receiver: req.receiver.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            content: req.content,
            created_at: now(),
        })
    }

    // -- Forum --

    pub fn list_topics(&self) -> Result<Vec<ForumTopic>> {
        self.read(Collection::ForumTopics)
    }

    pub fn get_topic(&self, id: u64) -> Result<Option<ForumTopic>> {
        self.find(Collection::ForumTopics, id)
    }

    pub fn insert_topic(&self, req: CreateTopicRequest) -> Result<ForumTopic> {
        self.append(Collection::ForumTopics, |id| ForumTopic {
            id,
            creator_id: req.creator_id,
            creator: req.creator.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            title: req.title,
            content: req.content,
            category: req.category.unwrap_or_else(|| DEFAULT_FORUM_CATEGORY.to_string()),
            comments_count: 0,
            created_at: now(),
        })
    }

    // -- Reviews --

    pub fn list_reviews(&self) -> Result<Vec<Review>> {
        self.read(Collection::Reviews)
    }

    pub fn get_review(&self, id: u64) -> Result<Option<Review>> {
        self.find(Collection::Reviews, id)
    }

    pub fn insert_review(&self, req: CreateReviewRequest) -> Result<Review> {
        self.append(Collection::Reviews, |id| Review {
            id,
            reviewer_id: req.reviewer_id,
            reviewer: req.reviewer.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            volunteer_id: req.volunteer_id,
            volunteer: req.volunteer.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            rating: req.rating,
            comment: req.comment.unwrap_or_default(),
            created_at: now(),
        })
    }

    // -- Helpers --

    /// Build a record with the next id, append it and save.
    fn append<T, F>(&self, collection: Collection, build: F) -> Result<T>
    where
        T: Record + Clone + serde::Serialize + DeserializeOwned,
        F: FnOnce(u64) -> T,
    {
        self.update(collection, |records: &mut Vec<T>| {
            let record = build(next_id(records));
            records.push(record.clone());
            Some(record)
        })?
        .ok_or_else(|| anyhow!("append to {} produced no record", collection.name()))
    }

    fn find<T: Record + DeserializeOwned>(&self, collection: Collection, id: u64) -> Result<Option<T>> {
        let records: Vec<T> = self.read(collection)?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }
}

/// Ids are the collection length at write time plus one.
fn next_id<T>(records: &[T]) -> u64 {
    records.len() as u64 + 1
}

/// Server-local wall-clock time, without an offset.
fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;
    use serde_json::json;

    #[test]
    fn create_user_rejects_duplicate_username() {
        let store = Store::open(&scratch_dir("dup_user")).unwrap();

        let first = store.create_user("ann", "hash", "help").unwrap().unwrap();
        assert_eq!(first.id, 1);
        assert!(store.create_user("ann", "other", "need").unwrap().is_none());

        let second = store.create_user("bob", "hash", "need").unwrap().unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(store.get_user_by_username("bob").unwrap().unwrap().role, "need");
        assert_eq!(store.get_user_by_id(1).unwrap().unwrap().username, "ann");
        assert!(store.get_user_by_id(3).unwrap().is_none());
    }

    #[test]
    fn help_request_defaults() {
        let store = Store::open(&scratch_dir("help_defaults")).unwrap();
        let req = store
            .insert_help_request(CreateHelpRequest {
                creator_id: Some(json!(1)),
                title: Some("Need ride".into()),
                description: Some("to the clinic".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(req.id, 1);
        assert_eq!(req.status, "open");
        assert_eq!(req.creator, "Unknown");
        assert_eq!(req.category, "other");
        assert_eq!(store.get_help_request(1).unwrap(), Some(req));
    }

    #[test]
    fn insert_appends_with_sequential_ids() {
        let store = Store::open(&scratch_dir("sequential")).unwrap();
        for expected in 1..=3 {
            let msg = store
                .insert_message(SendMessageRequest {
                    content: Some(format!("hello {expected}")),
                    ..Default::default()
                })
                .unwrap();
            assert_eq!(msg.id, expected);
            assert_eq!(msg.sender, "Unknown");
            assert_eq!(msg.receiver, "Unknown");
        }

        let all = store.list_messages().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.last().unwrap().content.as_deref(), Some("hello 3"));
    }

    #[test]
    fn topic_and_review_defaults() {
        let store = Store::open(&scratch_dir("topic_review")).unwrap();

        let topic = store.insert_topic(CreateTopicRequest::default()).unwrap();
        assert_eq!(topic.category, "general");
        assert_eq!(topic.comments_count, 0);

        let review = store
            .insert_review(CreateReviewRequest {
                rating: Some(json!(5)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(review.comment, "");
        assert_eq!(review.reviewer, "Unknown");
        assert_eq!(review.volunteer, "Unknown");
        assert!(store.get_review(2).unwrap().is_none());
    }

    #[test]
    fn lists_are_empty_before_first_write() {
        let store = Store::open(&scratch_dir("empty_lists")).unwrap();
        assert!(store.list_help_requests().unwrap().is_empty());
        assert!(store.list_messages().unwrap().is_empty());
        assert!(store.list_topics().unwrap().is_empty());
        assert!(store.list_reviews().unwrap().is_empty());
    }
}
