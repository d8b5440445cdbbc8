use crate::domain::ports::SuiReader;
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedObjectRow {
    pub object_id: String,
    pub object_type: String,
    pub version: String,
    pub digest: String,
}

/// 逐頁讀取地址擁有的物件
pub struct ObjectBrowser<R: SuiReader> {
    reader: R,
    page_size: usize,
    max_pages: usize,
}

impl<R: SuiReader> ObjectBrowser<R> {
    pub fn new(reader: R, page_size: usize, max_pages: usize) -> Self {
        Self {
            reader,
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }

    /// 依游標抓取直到沒有下一頁或達到頁數上限
    pub async fn fetch_all(&self, owner: &str) -> Result<Vec<OwnedObjectRow>> {
        let mut rows = Vec::new();
        let mut cursor: Option<String> = None;

        for page_number in 1..=self.max_pages {
            let page = self
                .reader
                .owned_objects(owner, cursor.as_deref(), self.page_size)
                .await?;

            tracing::debug!(
                "📄 Page {}: {} objects (has next page: {})",
                page_number,
                page.data.len(),
                page.has_next_page
            );

            for response in page.data {
                match response.data {
                    Some(data) => rows.push(OwnedObjectRow {
                        object_id: data.object_id,
                        object_type: data.object_type.unwrap_or_default(),
                        version: data.version,
                        digest: data.digest,
                    }),
                    None => {
                        if let Some(error) = response.error {
                            tracing::warn!("Skipping object entry with error: {}", error);
                        }
                    }
                }
            }

            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => {
                    sort_rows(&mut rows);
                    return Ok(rows);
                }
            }
        }

        tracing::warn!(
            "Stopped after {} pages; owner {} has more objects",
            self.max_pages,
            owner
        );
        sort_rows(&mut rows);
        Ok(rows)
    }
}

fn sort_rows(rows: &mut [OwnedObjectRow]) {
    rows.sort_by(|a, b| {
        a.object_type
            .cmp(&b.object_type)
            .then_with(|| a.object_id.cmp(&b.object_id))
    });
}
