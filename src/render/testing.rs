//! In-memory render session for tests

use crate::render::{RenderError, RenderResult, RenderSession};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::Mutex;

const BLANK_PAGE: &str = "<html><head></head><body></body></html>";

/// Serves scripted HTML snapshots; clicks move between a URL's pages
///
/// A click on an element with a `data-page` attribute jumps to that page
/// (1-based); any other matched click moves one page forward.
#[derive(Default)]
pub struct ScriptedSession {
    state: Mutex<ScriptState>,
}

#[derive(Default)]
struct ScriptState {
    pages: HashMap<String, Vec<String>>,
    current_url: Option<String>,
    current_page: usize,
    loads: Vec<String>,
    clicks: Vec<String>,
    quit_calls: usize,
    failing_clicks: bool,
    failing_loads: bool,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(self, url: &str, pages: Vec<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), pages);
        self
    }

    pub fn with_failing_clicks(self) -> Self {
        self.state.lock().unwrap().failing_clicks = true;
        self
    }

    pub fn with_failing_loads(self) -> Self {
        self.state.lock().unwrap().failing_loads = true;
        self
    }

    pub fn loads(&self) -> Vec<String> {
        self.state.lock().unwrap().loads.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn quit_calls(&self) -> usize {
        self.state.lock().unwrap().quit_calls
    }
}

impl ScriptState {
    fn current_source(&self) -> String {
        self.current_url
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .and_then(|pages| pages.get(self.current_page))
            .cloned()
            .unwrap_or_else(|| BLANK_PAGE.to_string())
    }
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn load(&self, url: &str) -> RenderResult<()> {
        let mut state = self.state.lock().unwrap();
        state.loads.push(url.to_string());
        if state.failing_loads {
            return Err(RenderError::Session(format!("navigation to {} failed", url)));
        }
        state.current_url = Some(url.to_string());
        state.current_page = 0;
        Ok(())
    }

    async fn snapshot(&self) -> RenderResult<String> {
        Ok(self.state.lock().unwrap().current_source())
    }

    async fn click(&self, selector: &str) -> RenderResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.clicks.push(selector.to_string());
        if state.failing_clicks {
            return Err(RenderError::Session("click failed".to_string()));
        }

        let target = {
            let document = Html::parse_document(&state.current_source());
            let selector = Selector::parse(selector)
                .map_err(|e| RenderError::Session(format!("bad selector: {}", e)))?;
            let Some(element) = document.select(&selector).next() else {
                return Ok(false);
            };
            element
                .value()
                .attr("data-page")
                .and_then(|p| p.parse::<usize>().ok())
                .map(|page| page.saturating_sub(1))
                .unwrap_or(state.current_page + 1)
        };

        state.current_page = target;
        Ok(true)
    }

    async fn quit(&self) -> RenderResult<()> {
        self.state.lock().unwrap().quit_calls += 1;
        Ok(())
    }
}

/// A Judge.me review page with numbered pagination controls
pub fn judgeme_page(current: u32, total: u32, reviews: &[(&str, &str)]) -> String {
    let items: String = reviews
        .iter()
        .map(|(author, body)| {
            format!(
                r#"<div class="jdgm-rev">
                     <span class="jdgm-rev__rating" data-score="5"></span>
                     <span class="jdgm-rev__timestamp" data-content="2024-01-0{current} 00:00:00 UTC"></span>
                     <span class="jdgm-rev__author">{author}</span>
                     <div class="jdgm-rev__body"><p>{body}</p></div>
                   </div>"#
            )
        })
        .collect();

    let controls: String = if total > 1 {
        (1..=total)
            .map(|n| {
                if n == current {
                    format!(r#"<span class="jdgm-paginate__page jdgm-curt" data-page="{n}">{n}</span>"#)
                } else {
                    format!(r#"<a class="jdgm-paginate__page" data-page="{n}">{n}</a>"#)
                }
            })
            .collect()
    } else {
        String::new()
    };

    format!(
        r#"<html><body>
             <div class="product__title">Scripted Product</div>
             <div class="jdgm-rev-widg__reviews">{items}</div>
             <div class="jdgm-paginate">{controls}</div>
           </body></html>"#
    )
}

/// A marketplace review page; `last` renders the disabled next control
pub fn marketplace_page(reviews: &[(&str, &str)], last: bool) -> String {
    let items: String = reviews
        .iter()
        .map(|(author, body)| {
            format!(
                r#"<div data-hook="review">
                     <span class="a-profile-name">{author}</span>
                     <i class="a-icon-star"><span>5.0 out of 5 stars</span></i>
                     <span data-hook="review-body"><span>{body}</span></span>
                   </div>"#
            )
        })
        .collect();

    let next = if last {
        r#"<li class="a-disabled a-last">Next page</li>"#.to_string()
    } else {
        r##"<li class="a-last"><a href="#">Next page</a></li>"##.to_string()
    };

    format!(r#"<html><body>{items}<ul class="a-pagination">{next}</ul></body></html>"#)
}
