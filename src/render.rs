//! HTML rendering. Everything here is a pure function of state; nothing fetches.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::detail::{Detail, DetailView};
use crate::pagination::PageInfo;
use crate::state::GalleryState;
use crate::store::Store;
use crate::types::MangaItem;

pub const PREV_LABEL: &str = "« Trước";
pub const NEXT_LABEL: &str = "Sau »";
pub const NO_CHAPTER_DATA: &str = "Không tìm thấy dữ liệu chap.";
pub const NO_CHAPTERS_YET: &str = "Chưa có chap.";
pub const LOAD_FAILED: &str = "Lỗi tải dữ liệu chap.";

/// How pagination controls link to other pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// `?page=N`, keeping the active query.
    Query,
    /// `index.html`, `page-2.html`, ... as written by a static build.
    StaticFiles,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub detail_page: String,
    pub page_link: PageLink,
    /// Render the search form when set; the form submits here.
    pub search_action: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { detail_page: "detail.html".to_string(), page_link: PageLink::Query, search_action: Some(String::new()) }
    }
}

pub fn page_file_name(page: usize) -> String {
    if page <= 1 { "index.html".to_string() } else { format!("page-{page}.html") }
}

fn page_href(options: &RenderOptions, query: Option<&str>, page: usize) -> String {
    match options.page_link {
        PageLink::StaticFiles => page_file_name(page),
        PageLink::Query => match query {
            Some(q) => format!("?q={}&page={}", urlencoding::encode(q), page),
            None => format!("?page={page}"),
        },
    }
}

/// Link to the detail view carrying `title`, `cover` and `chapters`, each percent-encoded.
pub fn detail_href(detail_page: &str, item: &MangaItem) -> String {
    format!(
        "{}?title={}&cover={}&chapters={}",
        detail_page,
        urlencoding::encode(&item.title),
        urlencoding::encode(&item.cover),
        urlencoding::encode(&item.chapters_json),
    )
}

pub fn render_card(item: &MangaItem, detail_page: &str) -> String {
    let href = detail_href(detail_page, item);
    format!(
        concat!(
            "<div class=\"manga-card\">\n",
            "  <a href=\"{href}\" target=\"_blank\" rel=\"noopener\">\n",
            "    <img src=\"{cover}\" alt=\"{alt}\" loading=\"lazy\"/>\n",
            "  </a>\n",
            "  <h3 title=\"{alt}\">{title}</h3>\n",
            "</div>\n",
        ),
        href = attr(&href),
        cover = attr(&item.cover),
        alt = attr(&item.title),
        title = text(&item.title),
    )
}

pub fn render_grid(state: &GalleryState, options: &RenderOptions) -> String {
    let mut out = String::from("<div id=\"manga-grid\">\n");
    for item in state.page_items() {
        out.push_str(&render_card(item, &options.detail_page));
    }
    out.push_str("</div>\n");
    out
}

pub fn render_pagination(info: PageInfo, query: Option<&str>, options: &RenderOptions) -> String {
    let control = |enabled: bool, target: usize, label: &str| {
        if enabled {
            format!("<a class=\"page-btn\" href=\"{}\">{}</a>", attr(&page_href(options, query, target)), text(label))
        } else {
            format!("<button disabled>{}</button>", text(label))
        }
    };
    format!(
        "<div id=\"pagination\">\n  {}\n  <span>Trang {} / {}</span>\n  {}\n</div>\n",
        control(info.has_prev(), info.prev(), PREV_LABEL),
        info.page,
        info.total_pages,
        control(info.has_next(), info.next(), NEXT_LABEL),
    )
}

/// Search input plus a clear control that only shows while a query is active.
pub fn render_search_bar(query: Option<&str>, action: &str) -> String {
    let clear_style = if query.is_some() { "inline-block" } else { "none" };
    let clear_href = if action.is_empty() { "?" } else { action };
    format!(
        concat!(
            "<form class=\"search\" method=\"get\" action=\"{action}\">\n",
            "  <input id=\"searchInput\" name=\"q\" type=\"search\" placeholder=\"Tìm truyện...\" value=\"{value}\"/>\n",
            "  <button type=\"submit\">Tìm</button>\n",
            "  <a id=\"clearBtn\" href=\"{clear}\" style=\"display:{style}\">Xóa</a>\n",
            "</form>\n",
        ),
        action = attr(action),
        value = attr(query.unwrap_or_default()),
        clear = attr(clear_href),
        style = clear_style,
    )
}

/// Search bar, grid and pagination for the current page. Full re-render every time.
pub fn render_index(state: &GalleryState, options: &RenderOptions) -> String {
    let mut out = String::new();
    if let Some(action) = &options.search_action {
        out.push_str(&render_search_bar(state.query(), action));
    }
    out.push_str(&render_grid(state, options));
    out.push_str(&render_pagination(state.page_info(), state.query(), options));
    out
}

pub fn render_detail(view: &DetailView) -> String {
    let body = match view {
        DetailView::NoChapterData => format!("<p>{NO_CHAPTER_DATA}</p>\n"),
        DetailView::Failed => format!("<p>{LOAD_FAILED}</p>\n"),
        DetailView::Loaded(detail) => render_loaded_detail(detail),
    };
    format!("<div id=\"manga-detail\">\n{body}</div>\n")
}

fn render_loaded_detail(detail: &Detail) -> String {
    let mut list = String::new();
    match &detail.chapters {
        Some(chapters) => {
            for c in chapters {
                let _ = writeln!(
                    list,
                    "  <li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></li>",
                    attr(&c.url),
                    text(&c.name)
                );
            }
        }
        None => {
            let _ = writeln!(list, "  <li>{NO_CHAPTERS_YET}</li>");
        }
    }
    format!(
        "<img src=\"{}\" alt=\"{}\"/>\n<h2>{}</h2>\n<ul class=\"chapter-list\">\n{}</ul>\n",
        attr(&detail.cover),
        attr(&detail.title),
        text(&detail.title),
        list
    )
}

/// Wrap a rendered fragment in a standalone page.
pub fn render_document(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"vi\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\"/>\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n",
            "<title>{}</title>\n",
            "</head>\n",
            "<body>\n{}</body>\n",
            "</html>\n",
        ),
        text(title),
        body
    )
}

/// Re-render the gallery into `sink` after every accepted store update.
pub fn subscribe_renderer<F>(store: &mut Store, options: RenderOptions, mut sink: F)
where
    F: FnMut(String) + Send + 'static,
{
    store.subscribe(move |update| sink(render_index(update.state, &options)));
}
