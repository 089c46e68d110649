//! `:link` text directives: GitHub accounts and repos, npm packages, URLs.

use std::sync::LazyLock;

use rds_tree::{Directive, Element, HastNode, PropertyValue};
use regex::Regex;

use crate::error::DirectiveError;
use crate::matcher::Family;
use crate::options::{LinkIcon, LinkOptions};
use crate::props::{attributes_to_properties, attributes_without, layer, merge_layers};
use crate::resolver::{RenderTarget, Resolver};

static GITHUB_ACCOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@[a-zA-Z0-9][A-Za-z0-9_-]{0,37}[a-zA-Z0-9]$").expect("invalid account regex")
});

static GITHUB_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9][A-Za-z0-9_-]{0,37}[a-zA-Z0-9])/.*$").expect("invalid repo regex")
});

static NPM_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@[a-z0-9][a-z0-9._-]*/)?[a-z0-9][a-z0-9._-]*$").expect("invalid npm regex")
});

pub(crate) static GENERIC_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:[A-Za-z0-9_-]+\.)+[a-z]{2,}(?:/\S*)?$")
        .expect("invalid url regex")
});

static PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Za-z0-9_]+:)?//").expect("invalid protocol regex"));

const GITHUB_TABS: &[&str] = &[
    "repositories",
    "projects",
    "packages",
    "stars",
    "sponsoring",
    "sponsors",
    "org-repositories",
    "org-projects",
    "org-packages",
    "org-sponsoring",
    "org-people",
];

const NPM_TABS: &[&str] = &["readme", "code", "dependencies", "dependents", "versions"];

const NPM_HOST: &str = "www.npmjs.com";

/// Characters of a URL path kept in generated link text.
const MAX_PATH_CHARS: usize = 14;

/// What a link `id` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    GithubAccount,
    GithubRepo,
    NpmPackage,
    CustomUrl,
}

impl LinkKind {
    /// Classify an id; the first matching grammar wins.
    fn classify(id: &str) -> Option<Self> {
        if GITHUB_ACCOUNT.is_match(id) && !id.contains("--") {
            Some(Self::GithubAccount)
        } else if GITHUB_REPO.is_match(id) && !id.contains("--") {
            Some(Self::GithubRepo)
        } else if (1..=214).contains(&id.len()) && NPM_PACKAGE.is_match(id) {
            Some(Self::NpmPackage)
        } else if GENERIC_URL.is_match(id) {
            Some(Self::CustomUrl)
        } else {
            None
        }
    }

    /// Value of the `data-link` marker.
    fn as_str(self) -> &'static str {
        match self {
            Self::GithubAccount => "github-acct",
            Self::GithubRepo => "github-repo",
            Self::NpmPackage => "npm-pkg",
            Self::CustomUrl => "custom-url",
        }
    }

    /// Tabs this kind of link can open, or `None` if tabs do not apply.
    fn tabs(self) -> Option<&'static [&'static str]> {
        match self {
            Self::GithubAccount => Some(GITHUB_TABS),
            Self::NpmPackage => Some(NPM_TABS),
            Self::GithubRepo | Self::CustomUrl => None,
        }
    }
}

pub(crate) struct LinkResolver {
    options: LinkOptions,
    base_class: String,
}

impl LinkResolver {
    pub(crate) fn new(options: LinkOptions, class_prefix: &str) -> Self {
        Self {
            options,
            base_class: format!("{class_prefix}-link"),
        }
    }

    fn favicon(&self, host: &str) -> String {
        self.options.favicon.replace("{domain}", host)
    }

    fn icon_element(&self, icon: &str, node: &Directive) -> Element {
        let extra = self.options.img_props.as_ref().and_then(|s| s.resolve(node));
        match self.options.icon {
            LinkIcon::Background => {
                let base = layer("style", format!("background-image: url({icon})"));
                Element::new("span").with_properties(merge_layers([base, extra]))
            }
            LinkIcon::Img => {
                let mut props = merge_layers([layer("src", icon), extra]);
                props
                    .entry("alt".to_owned())
                    .or_insert_with(|| PropertyValue::from(""));
                Element::new("img").with_properties(props)
            }
        }
    }
}

impl Resolver for LinkResolver {
    fn family(&self) -> Family {
        Family::Link
    }

    fn resolve(
        &self,
        directive: &mut Directive,
        _suffix: Option<&str>,
    ) -> Result<RenderTarget, DirectiveError> {
        let node: &Directive = directive;
        let id = node
            .attr("id")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DirectiveError::validation(Family::Link, "The `id` is missing."))?;
        let kind = LinkKind::classify(id)
            .ok_or_else(|| DirectiveError::validation(Family::Link, "The `id` is invalid."))?;

        let tab = match node.attr("tab").filter(|t| !t.is_empty()) {
            None => None,
            Some(tab) => {
                let allowed = match kind.tabs() {
                    Some(tabs) => tabs.contains(&tab),
                    None => GITHUB_TABS.contains(&tab) || NPM_TABS.contains(&tab),
                };
                if !allowed {
                    return Err(DirectiveError::validation(
                        Family::Link,
                        "The `tab` is invalid.",
                    ));
                }
                kind.tabs().map(|_| tab)
            }
        };
        let url_override = node.attr("url").filter(|u| !u.is_empty());
        let img_override = node.attr("img").filter(|i| !i.is_empty());

        let (href, icon, fallback_text) = match kind {
            LinkKind::GithubAccount => {
                let account = &id[1..];
                let href = url_override.map_or_else(
                    || match tab.map(|t| (t, t.strip_prefix("org-"))) {
                        Some((_, Some(org_tab))) => {
                            format!("https://github.com/orgs/{account}/{org_tab}")
                        }
                        Some((tab, None)) => format!("https://github.com/{account}?tab={tab}"),
                        None => format!("https://github.com/{account}"),
                    },
                    str::to_owned,
                );
                let icon = format!("https://github.com/{account}.png");
                (href, icon, account.to_owned())
            }
            LinkKind::GithubRepo => {
                let owner = GITHUB_REPO
                    .captures(id)
                    .and_then(|c| c.get(1))
                    .map_or(id, |m| m.as_str());
                let href = url_override
                    .map_or_else(|| format!("https://github.com/{id}"), str::to_owned);
                (href, format!("https://github.com/{owner}.png"), id.to_owned())
            }
            LinkKind::NpmPackage => {
                let href = url_override.map_or_else(
                    || match tab {
                        Some(tab) => format!("https://{NPM_HOST}/package/{id}?activeTab={tab}"),
                        None => format!("https://{NPM_HOST}/package/{id}"),
                    },
                    str::to_owned,
                );
                (href, self.favicon(NPM_HOST), id.to_owned())
            }
            LinkKind::CustomUrl => {
                let href = url_override.unwrap_or(id).to_owned();
                let icon = self.favicon(host(&href));
                (href, icon, shorten_url(id))
            }
        };
        let icon = img_override.map_or(icon, str::to_owned);
        let text = node.first_text().map_or(fallback_text, str::to_owned);

        let local = attributes_without(&node.attributes, &["id", "url", "img", "tab"]);
        let mut properties = merge_layers([
            layer("className", vec![self.base_class.clone()]),
            self.options.a_props.as_ref().and_then(|s| s.resolve(node)),
            layer("data-link", kind.as_str()),
            Some(attributes_to_properties(&local)),
        ]);
        properties.insert("href".to_owned(), PropertyValue::from(href));

        let children = vec![
            HastNode::from(self.icon_element(&icon, node)),
            HastNode::Text(text),
        ];
        Ok(RenderTarget::new("a", properties).with_children(children))
    }
}

fn strip_protocol(url: &str) -> &str {
    PROTOCOL.find(url).map_or(url, |m| &url[m.end()..])
}

/// Host part of a URL with or without a protocol.
fn host(url: &str) -> &str {
    let rest = strip_protocol(url);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

/// Protocol-less URL with the path cut to a fixed length.
fn shorten_url(url: &str) -> String {
    let rest = strip_protocol(url);
    let Some((host, path)) = rest.split_once('/') else {
        return rest.to_owned();
    };
    if path.is_empty() {
        return host.to_owned();
    }
    match path.char_indices().nth(MAX_PATH_CHARS) {
        Some((cut, _)) => format!("{host}/{}...", &path[..cut]),
        None => format!("{host}/{path}"),
    }
}
