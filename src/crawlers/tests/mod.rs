//! Scripted stand-in for a browser page, so the flows can run without WebDriver.

mod product_tests;

use crate::crawlers::driver::PageDriver;
use crate::crawlers::scripts;
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// Script outcome: `Err` holds the message of a script that throws
pub type ScriptResult = std::result::Result<Value, String>;

/// One document the fake page can show
#[derive(Default, Clone)]
pub struct FakeDocument {
    pub html: Option<String>,
    /// Script outcomes keyed by script name (see `script_name`)
    pub scripts: HashMap<&'static str, ScriptResult>,
    pub has_next: bool,
}

impl FakeDocument {
    pub fn with_html(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self
    }

    pub fn with_script(mut self, name: &'static str, result: ScriptResult) -> Self {
        self.scripts.insert(name, result);
        self
    }

    pub fn with_next(mut self) -> Self {
        self.has_next = true;
        self
    }
}

/// A page that walks through `documents` as the next-page control is clicked
#[derive(Default)]
pub struct FakePage {
    documents: Vec<FakeDocument>,
    current: Mutex<usize>,
    fail_goto: bool,
    visited: Mutex<Vec<String>>,
    executed: Mutex<Vec<&'static str>>,
    advance_calls: Mutex<usize>,
}

impl FakePage {
    pub fn new(documents: Vec<FakeDocument>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail_goto: true,
            ..Self::default()
        }
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    /// Names of the scripts run, in order, excluding scrolling and pagination
    pub fn executed(&self) -> Vec<&'static str> {
        self.executed.lock().unwrap().clone()
    }

    /// Times the next-page control was asked to click
    pub fn advance_calls(&self) -> usize {
        *self.advance_calls.lock().unwrap()
    }

    fn document(&self) -> FakeDocument {
        let index = *self.current.lock().unwrap();
        self.documents.get(index).cloned().unwrap_or_default()
    }
}

fn script_name(script: &str) -> &'static str {
    [
        (scripts::INITIAL_STATE_PRODUCT, "initial-state"),
        (scripts::NUXT_PRODUCT, "nuxt"),
        (scripts::NEXT_DATA_PRODUCT, "next-data"),
        (scripts::PRODUCT_LINKS, "product-links"),
    ]
    .iter()
    .find(|(text, _)| *text == script)
    .map(|(_, name)| *name)
    .unwrap_or("unknown")
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        if self.fail_goto {
            return Err(ScrapeError::Timeout(45, "loading page"));
        }
        *self.current.lock().unwrap() = 0;
        Ok(())
    }

    async fn source(&self) -> Result<String> {
        self.document()
            .html
            .ok_or_else(|| ScrapeError::probe("source", "no document"))
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        if script == scripts::SCROLL_TO_BOTTOM {
            return Ok(json!(2000));
        }

        if script == scripts::NEXT_PAGE {
            let click = args.first().and_then(Value::as_bool).unwrap_or(false);
            let has_next = self.document().has_next;
            if click {
                *self.advance_calls.lock().unwrap() += 1;
                if has_next {
                    *self.current.lock().unwrap() += 1;
                }
            }
            return Ok(json!(has_next));
        }

        let name = script_name(script);
        self.executed.lock().unwrap().push(name);
        match self.document().scripts.get(name).cloned() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(ScrapeError::probe(name, message)),
            None => Ok(Value::Null),
        }
    }
}
