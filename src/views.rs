// HTML pages rendered from the tera templates under templates/.
// Autoescaping is on for every page; user text never reaches the output raw.

use axum::response::Html;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::{
    error::AppResult,
    services::{PostDetail, PostSummary},
};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("feed.html", include_str!("../templates/feed.html")),
    ("post.html", include_str!("../templates/post.html")),
    ("create_post.html", include_str!("../templates/create_post.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("register.html", include_str!("../templates/register.html")),
];

/// Escapes text for element bodies and double-quoted attribute values alike.
fn escape_html(raw: &str) -> String {
    html_escape::encode_double_quoted_attribute(raw).into_owned()
}

#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())?;
        tera.autoescape_on(vec![".html"]);
        tera.set_escape_fn(escape_html);

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    fn render(&self, template: &str, context: &Context) -> AppResult<Html<String>> {
        Ok(Html(self.tera.render(template, context)?))
    }

    pub fn feed_page(&self, viewer_name: &str, posts: &[PostSummary]) -> AppResult<Html<String>> {
        let mut context = Context::new();
        context.insert("viewer_name", viewer_name);
        context.insert("posts", posts);
        self.render("feed.html", &context)
    }

    pub fn post_page(&self, post: &PostDetail) -> AppResult<Html<String>> {
        let mut context = Context::new();
        context.insert("post", post);
        self.render("post.html", &context)
    }

    pub fn create_post_page(&self) -> AppResult<Html<String>> {
        self.render("create_post.html", &Context::new())
    }

    pub fn login_page(&self, error: Option<&str>) -> AppResult<Html<String>> {
        let mut context = Context::new();
        context.insert("error", &error);
        self.render("login.html", &context)
    }

    pub fn register_page(&self) -> AppResult<Html<String>> {
        self.render("register.html", &Context::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(content: &str, username: &str) -> PostSummary {
        PostSummary {
            post_id: 2,
            user_id: 2,
            username: username.to_string(),
            content: content.to_string(),
            timestamp: "2024-05-01 09:30".to_string(),
            like_count: 3,
            is_retweet: true,
            original_post_username: Some("alice".to_string()),
        }
    }

    #[test]
    fn test_feed_page_escapes_content() {
        let views = Views::new().unwrap();
        let posts = vec![summary("RT @alice: <script>\"x\" & y</script>", "b&b")];

        let Html(page) = views.feed_page("bob", &posts).unwrap();
        assert!(page.contains("RT @alice: &lt;script&gt;&quot;x&quot; &amp; y&lt;/script&gt;"));
        assert!(page.contains("@b&amp;b"));
        assert!(page.contains("Retweeted from @alice"));
        assert!(page.contains("3 likes"));
        assert!(page.contains("<time>2024-05-01 09:30</time>"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_empty_feed() {
        let views = Views::new().unwrap();
        let Html(page) = views.feed_page("bob", &[]).unwrap();
        assert!(page.contains("No posts yet."));
    }

    #[test]
    fn test_post_page_like_button_and_original_link() {
        let views = Views::new().unwrap();
        let mut post = PostDetail {
            post_id: 2,
            user_id: 1,
            username: "alice".to_string(),
            content: "RT @alice: hello".to_string(),
            timestamp: "2024-05-01 09:31".to_string(),
            like_count: 1,
            is_liked: true,
            is_retweet: true,
            original_post_id: Some(1),
            original_post_username: Some("alice".to_string()),
        };

        let Html(page) = views.post_page(&post).unwrap();
        assert!(page.contains("Unlike"));
        assert!(page.contains("href=\"/post/1\""));

        post.is_liked = false;
        post.is_retweet = false;
        post.original_post_id = None;
        post.original_post_username = None;
        let Html(page) = views.post_page(&post).unwrap();
        assert!(page.contains("<button>Like</button>"));
        assert!(!page.contains("Original post"));
    }

    #[test]
    fn test_login_page_error() {
        let views = Views::new().unwrap();
        let Html(page) = views.login_page(Some("Invalid username or password")).unwrap();
        assert!(page.contains("Invalid username or password"));
        let Html(page) = views.login_page(None).unwrap();
        assert!(!page.contains("class=\"error\""));
    }
}
