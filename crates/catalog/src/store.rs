use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use surtido_core::{ArticleId, DomainError, DomainResult};

use crate::article::Article;

/// Filter for [`CatalogStore::list`].
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub category: Option<String>,
    /// Case-insensitive match against code or name.
    pub text: Option<String>,
    pub below_reorder_point: bool,
}

impl ArticleFilter {
    fn matches(&self, article: &Article) -> bool {
        if let Some(category) = &self.category {
            if !article.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            if !article.code.to_lowercase().contains(&needle)
                && !article.name.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if self.below_reorder_point && !article.needs_replenishment() {
            return false;
        }
        true
    }
}

/// Shared article store.
///
/// Read-mostly. Each mutating operation holds the write lock for its whole
/// update, so readers never observe a half-applied stock movement.
#[derive(Debug, Default)]
pub struct CatalogStore {
    articles: RwLock<HashMap<ArticleId, Article>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an article after checking the catalog invariants.
    pub fn upsert(&self, article: Article) -> DomainResult<()> {
        article.validate()?;
        let mut articles = self.write();
        articles.insert(article.id, article);
        Ok(())
    }

    pub fn get(&self, id: ArticleId) -> DomainResult<Article> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("article", id))
    }

    /// Filtered listing, sorted by article code — the stable order the
    /// planner's determinism relies on.
    pub fn list(&self, filter: &ArticleFilter) -> Vec<Article> {
        let mut out: Vec<Article> = self
            .read()
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }

    /// Consistent copy of the whole catalog for a planning run.
    pub fn snapshot(&self) -> Vec<Article> {
        self.list(&ArticleFilter::default())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Goods received from a supplier: raises `available`.
    pub fn receive_stock(&self, id: ArticleId, quantity: i64) -> DomainResult<()> {
        self.adjust(id, "receive_stock", quantity, |article, qty| {
            article.available += qty;
            Ok(())
        })
    }

    /// Units sold directly off the shelf: lowers `available`.
    pub fn record_sale(&self, id: ArticleId, quantity: i64) -> DomainResult<()> {
        self.adjust(id, "record_sale", quantity, |article, qty| {
            if article.available < qty {
                return Err(DomainError::validation(format!(
                    "sale of {qty} exceeds available stock {}",
                    article.available
                )));
            }
            article.available -= qty;
            Ok(())
        })
    }

    /// Reserve units against an open sale: `available` -> `committed`.
    pub fn commit_stock(&self, id: ArticleId, quantity: i64) -> DomainResult<()> {
        self.adjust(id, "commit_stock", quantity, |article, qty| {
            if article.available < qty {
                return Err(DomainError::validation(format!(
                    "cannot commit {qty} units, only {} available",
                    article.available
                )));
            }
            article.available -= qty;
            article.committed += qty;
            Ok(())
        })
    }

    /// Cancel a reservation: `committed` -> `available`.
    pub fn release_stock(&self, id: ArticleId, quantity: i64) -> DomainResult<()> {
        self.adjust(id, "release_stock", quantity, |article, qty| {
            if article.committed < qty {
                return Err(DomainError::validation(format!(
                    "cannot release {qty} units, only {} committed",
                    article.committed
                )));
            }
            article.committed -= qty;
            article.available += qty;
            Ok(())
        })
    }

    fn adjust(
        &self,
        id: ArticleId,
        operation: &'static str,
        quantity: i64,
        apply: impl FnOnce(&mut Article, i64) -> DomainResult<()>,
    ) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }

        let mut articles = self.write();
        let article = articles
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("article", id))?;
        apply(article, quantity)?;

        tracing::info!(
            article = %article.code,
            operation,
            quantity,
            available = article.available,
            committed = article.committed,
            "stock updated"
        );
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ArticleId, Article>> {
        self.articles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ArticleId, Article>> {
        self.articles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
