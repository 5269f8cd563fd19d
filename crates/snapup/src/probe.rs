// Probe - the DOM capability contract the engine drives
//
// Every step handler is written purely against this trait; no handler
// depends on a specific automation engine. A host binds it to whatever
// driver it runs (Playwright, CDP, a scripted stub in tests).
//
// Selectors are plain strings. Chained selectors compose with ` >> `
// and positional narrowing uses `nth=N`, so an engine that understands
// Playwright selector syntax can pass them through unchanged and a stub
// can treat them as opaque keys.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Minimal DOM query/interaction capability set.
///
/// All operations are asynchronous and selector-addressed. Operations
/// that act on an element (`inner_text`, `click`, ...) resolve the
/// selector at call time; `wait_for_attached` is the only call that
/// blocks until the element exists.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Navigates the page to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Returns the page's current URL.
    async fn current_url(&self) -> Result<String>;

    /// Returns the page title.
    async fn title(&self) -> Result<String>;

    /// Waits until an element matching `selector` is attached to the
    /// DOM, failing with [`Error::ElementNotFound`] on timeout.
    ///
    /// [`Error::ElementNotFound`]: crate::error::Error::ElementNotFound
    async fn wait_for_attached(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Returns the element's visible text.
    async fn inner_text(&self, selector: &str) -> Result<String>;

    /// Returns the current value of an input element.
    async fn input_value(&self, selector: &str) -> Result<String>;

    /// Returns the value of the named attribute, or `None` if absent.
    async fn get_attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Clicks the element.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Types `text` into the element one character at a time.
    async fn type_text(&self, selector: &str, text: &str, per_char_delay: Duration) -> Result<()>;

    /// Sets the element's value directly, without per-character delay.
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;

    /// Returns the number of elements matching `selector` right now.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Scrolls the page by the given deltas.
    async fn scroll_by(&self, dx: i64, dy: i64) -> Result<()>;
}

/// Shared page handle. One per run, exclusively owned by that run's
/// session for its whole lifetime.
pub type PageHandle = Arc<dyn Probe>;

/// Locator represents a way to address element(s) on the page.
///
/// Locators are lazy - they hold a selector and a page handle and do
/// not touch the DOM until an operation is performed. Sub-locators
/// compose with ` >> ` and positional narrowing with `nth=`, mirroring
/// Playwright selector chaining.
#[derive(Clone)]
pub struct Locator {
    page: PageHandle,
    selector: String,
}

impl Locator {
    pub fn new(page: PageHandle, selector: impl Into<String>) -> Self {
        Self {
            page,
            selector: selector.into(),
        }
    }

    /// Returns the selector string for this locator
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Creates a sub-locator within this locator's subtree.
    pub fn locator(&self, selector: &str) -> Locator {
        Locator::new(
            Arc::clone(&self.page),
            format!("{} >> {}", self.selector, selector),
        )
    }

    /// Creates a locator for the nth matching element (0-indexed).
    pub fn nth(&self, index: usize) -> Locator {
        Locator::new(
            Arc::clone(&self.page),
            format!("{} >> nth={}", self.selector, index),
        )
    }

    /// Snapshot of all matching elements, in document order.
    ///
    /// The snapshot is taken at call time and is not live; rows added
    /// after the call are not visited.
    pub async fn all(&self) -> Result<Vec<Locator>> {
        let n = self.page.count(&self.selector).await?;
        Ok((0..n).map(|i| self.nth(i)).collect())
    }

    pub async fn wait_for_attached(&self, timeout: Duration) -> Result<()> {
        self.page.wait_for_attached(&self.selector, timeout).await
    }

    pub async fn inner_text(&self) -> Result<String> {
        self.page.inner_text(&self.selector).await
    }

    pub async fn input_value(&self) -> Result<String> {
        self.page.input_value(&self.selector).await
    }

    pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        self.page.get_attribute(&self.selector, name).await
    }

    pub async fn click(&self) -> Result<()> {
        self.page.click(&self.selector).await
    }

    pub async fn type_text(&self, text: &str, per_char_delay: Duration) -> Result<()> {
        self.page.type_text(&self.selector, text, per_char_delay).await
    }

    pub async fn fill(&self, text: &str) -> Result<()> {
        self.page.fill(&self.selector, text).await
    }

    pub async fn count(&self) -> Result<usize> {
        self.page.count(&self.selector).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct NullProbe;

    #[async_trait]
    impl Probe for NullProbe {
        async fn goto(&self, _url: &str) -> Result<()> {
            Ok(())
        }
        async fn current_url(&self) -> Result<String> {
            Ok("about:blank".into())
        }
        async fn title(&self) -> Result<String> {
            Ok(String::new())
        }
        async fn wait_for_attached(&self, selector: &str, _timeout: Duration) -> Result<()> {
            Err(Error::ElementNotFound(selector.into()))
        }
        async fn inner_text(&self, _selector: &str) -> Result<String> {
            Ok(String::new())
        }
        async fn input_value(&self, _selector: &str) -> Result<String> {
            Ok(String::new())
        }
        async fn get_attribute(&self, _selector: &str, _name: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn click(&self, _selector: &str) -> Result<()> {
            Ok(())
        }
        async fn type_text(
            &self,
            _selector: &str,
            _text: &str,
            _per_char_delay: Duration,
        ) -> Result<()> {
            Ok(())
        }
        async fn fill(&self, _selector: &str, _text: &str) -> Result<()> {
            Ok(())
        }
        async fn count(&self, _selector: &str) -> Result<usize> {
            Ok(3)
        }
        async fn scroll_by(&self, _dx: i64, _dy: i64) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn selector_chaining() {
        let page: PageHandle = Arc::new(NullProbe);
        let row = Locator::new(page, ".ticket-unit").nth(2);
        assert_eq!(row.selector(), ".ticket-unit >> nth=2");
        let price = row.locator(".ticket-price");
        assert_eq!(price.selector(), ".ticket-unit >> nth=2 >> .ticket-price");
    }

    #[tokio::test]
    async fn all_snapshots_in_document_order() {
        let page: PageHandle = Arc::new(NullProbe);
        let rows = Locator::new(page, ".ticket-unit").all().await.unwrap();
        let selectors: Vec<_> = rows.iter().map(|l| l.selector().to_string()).collect();
        assert_eq!(
            selectors,
            vec![
                ".ticket-unit >> nth=0",
                ".ticket-unit >> nth=1",
                ".ticket-unit >> nth=2",
            ]
        );
    }
}
