//! Member Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Member, MemberCreate};
use crate::utils::time::now_secs;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "member";

#[derive(Clone)]
pub struct MemberRepository {
    base: BaseRepository,
}

impl MemberRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all members, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Member>> {
        let members: Vec<Member> = self
            .base
            .db()
            .query("SELECT * FROM member ORDER BY joinDate DESC")
            .await?
            .take(0)?;
        Ok(members)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Member>> {
        let Ok(record_id) = id.parse::<RecordId>() else {
            return Ok(None);
        };
        let member: Option<Member> = self.base.db().select(record_id).await?;
        Ok(member)
    }

    /// Find member by phone (phone is the natural key)
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<Member>> {
        let phone_owned = phone.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM member WHERE phone = $phone LIMIT 1")
            .bind(("phone", phone_owned))
            .await?;
        let members: Vec<Member> = result.take(0)?;
        Ok(members.into_iter().next())
    }

    /// Create a new member
    pub async fn create(&self, data: MemberCreate) -> RepoResult<Member> {
        // Check duplicate phone
        if self.find_by_phone(&data.phone).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Member with phone '{}' already exists",
                data.phone
            )));
        }

        let member = Member {
            id: None,
            name: data.name,
            phone: data.phone,
            member_type: data.member_type,
            balance: data.balance.unwrap_or(0.0),
            points: data.points.unwrap_or(0),
            level: data.level.unwrap_or(1),
            join_date: now_secs(),
            avatar: data.avatar,
            birthday: data.birthday,
            gender: data.gender,
            is_active: true,
        };

        let created: Option<Member> = self.base.db().create(TABLE).content(member).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create member".to_string()))
    }
}
