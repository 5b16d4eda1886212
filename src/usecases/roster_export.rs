//! Roster export: dump the chat's members to a semicolon-delimited CSV so
//! the operator can add the instrument column and produce the musician
//! registry.
//!
//! The file is written with a UTF-8 BOM; Excel otherwise mangles Cyrillic.

use crate::domain::DomainError;
use crate::ports::MessageSource;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

pub struct RosterExporter {
    source: Arc<dyn MessageSource>,
}

impl RosterExporter {
    pub fn new(source: Arc<dyn MessageSource>) -> Self {
        Self { source }
    }

    /// Write `user_id;first_name;last_name;username` rows for every chat
    /// member. Returns the number of members written.
    pub async fn export(&self, out: &Path) -> Result<usize, DomainError> {
        let members = self.source.list_participants().await?;

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(Vec::new());
        wtr.write_record(["user_id", "first_name", "last_name", "username"])
            .map_err(|e| DomainError::Registry(e.to_string()))?;
        for m in &members {
            wtr.write_record([
                m.id.to_string().as_str(),
                &m.first_name,
                &m.last_name,
                &m.username,
            ])
            .map_err(|e| DomainError::Registry(e.to_string()))?;
        }
        let body = wtr
            .into_inner()
            .map_err(|e| DomainError::Registry(e.to_string()))?;

        let mut bytes = Vec::with_capacity(UTF8_BOM.len() + body.len());
        bytes.extend_from_slice(UTF8_BOM);
        bytes.extend_from_slice(&body);
        tokio::fs::write(out, bytes)
            .await
            .map_err(|e| DomainError::Registry(format!("write {}: {e}", out.display())))?;

        info!(
            members = members.len(),
            path = %out.display(),
            "roster exported; add the 'Инструмент' column to use it as the registry"
        );
        Ok(members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatMember, PollMessage, TopicInfo};

    struct TwoMembers;

    #[async_trait::async_trait]
    impl MessageSource for TwoMembers {
        async fn list_topics(&self, _query: Option<&str>) -> Result<Vec<TopicInfo>, DomainError> {
            Ok(vec![])
        }

        async fn find_polls(
            &self,
            _topic_id: i32,
            _limit: i32,
        ) -> Result<Vec<PollMessage>, DomainError> {
            Ok(vec![])
        }

        async fn list_participants(&self) -> Result<Vec<ChatMember>, DomainError> {
            Ok(vec![
                ChatMember {
                    id: 1,
                    first_name: "Анна".into(),
                    last_name: "Петрова".into(),
                    username: "anna".into(),
                },
                ChatMember {
                    id: 2,
                    first_name: "Борис".into(),
                    last_name: String::new(),
                    username: String::new(),
                },
            ])
        }
    }

    #[tokio::test]
    async fn writes_bom_header_and_rows() {
        let dir = std::env::temp_dir().join("tg-rollcall-roster-test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let out = dir.join("members.csv");

        let exporter = RosterExporter::new(Arc::new(TwoMembers));
        let written = exporter.export(&out).await.unwrap();
        assert_eq!(written, 2);

        let bytes = tokio::fs::read(&out).await.unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("user_id;first_name;last_name;username"));
        assert_eq!(lines.next(), Some("1;Анна;Петрова;anna"));
        assert_eq!(lines.next(), Some("2;Борис;;"));

        tokio::fs::remove_file(&out).await.ok();
    }
}
