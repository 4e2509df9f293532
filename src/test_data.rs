use std::cell::RefCell;

use crate::media::{FetchError, MediaFetcher};

pub const SAMPLE_WXR: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0"
	xmlns:excerpt="http://wordpress.org/export/1.2/excerpt/"
	xmlns:content="http://purl.org/rss/1.0/modules/content/"
	xmlns:dc="http://purl.org/dc/elements/1.1/"
	xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
	<title>Caf&#233; &amp; Code</title>
	<link>https://example.com</link>
	<wp:wxr_version>1.2</wp:wxr_version>
	<item>
		<title><![CDATA[About]]></title>
		<dc:creator><![CDATA[admin]]></dc:creator>
		<content:encoded><![CDATA[<p>We write about <em>café</em> &amp; code.</p>]]></content:encoded>
		<wp:post_id>2</wp:post_id>
		<wp:post_date><![CDATA[2020-03-01 09:00:00]]></wp:post_date>
		<wp:post_name><![CDATA[about]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_parent>0</wp:post_parent>
		<wp:menu_order>1</wp:menu_order>
		<wp:post_type><![CDATA[page]]></wp:post_type>
		<wp:postmeta>
			<wp:meta_key><![CDATA[_wp_page_template]]></wp:meta_key>
			<wp:meta_value><![CDATA[default]]></wp:meta_value>
		</wp:postmeta>
	</item>
	<item>
		<title><![CDATA[Our Team]]></title>
		<content:encoded><![CDATA[<p>People.</p><img src="https://cdn.example.com/uploads/Team Photo.JPG" alt="team">]]></content:encoded>
		<wp:post_id>3</wp:post_id>
		<wp:post_name><![CDATA[team]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_parent>2</wp:post_parent>
		<wp:menu_order>0</wp:menu_order>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Contact]]></title>
		<content:encoded><![CDATA[<p>Write to us.</p>]]></content:encoded>
		<wp:post_id>4</wp:post_id>
		<wp:post_name><![CDATA[contact]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_parent>0</wp:post_parent>
		<wp:menu_order>1</wp:menu_order>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Secret plans]]></title>
		<content:encoded><![CDATA[<p>Not yet.</p>]]></content:encoded>
		<wp:post_id>5</wp:post_id>
		<wp:post_date><![CDATA[0000-00-00 00:00:00]]></wp:post_date>
		<wp:post_name><![CDATA[]]></wp:post_name>
		<wp:status><![CDATA[draft]]></wp:status>
		<wp:post_parent>0</wp:post_parent>
		<wp:menu_order>0</wp:menu_order>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Orphan]]></title>
		<content:encoded><![CDATA[<p>My parent is gone.</p>]]></content:encoded>
		<wp:post_id>6</wp:post_id>
		<wp:post_name><![CDATA[orphan]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_parent>99</wp:post_parent>
		<wp:menu_order>5</wp:menu_order>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Blog]]></title>
		<content:encoded><![CDATA[<p>Clashes with the posts folder.</p>]]></content:encoded>
		<wp:post_id>7</wp:post_id>
		<wp:post_name><![CDATA[blog]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_parent>0</wp:post_parent>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Contact]]></title>
		<content:encoded><![CDATA[<p>Second contact page.</p>]]></content:encoded>
		<wp:post_id>8</wp:post_id>
		<wp:post_name><![CDATA[contact]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_parent>0</wp:post_parent>
		<wp:menu_order>9</wp:menu_order>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[History]]></title>
		<content:encoded><![CDATA[<p>Deep page.</p>]]></content:encoded>
		<wp:post_id>9</wp:post_id>
		<wp:post_name><![CDATA[]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_parent>3</wp:post_parent>
		<wp:menu_order>0</wp:menu_order>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Hello World]]></title>
		<category domain="category" nicename="news"><![CDATA[News]]></category>
		<category domain="post_tag" nicename="rust"><![CDATA[rust]]></category>
		<category domain="category" nicename="news"><![CDATA[News]]></category>
		<content:encoded><![CDATA[<p>First!</p><img src="https://cdn.example.com/uploads/hello.png">]]></content:encoded>
		<wp:post_id>10</wp:post_id>
		<wp:post_date><![CDATA[2024-01-02 10:11:12]]></wp:post_date>
		<wp:post_name><![CDATA[hello-world]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_parent>0</wp:post_parent>
		<wp:menu_order>0</wp:menu_order>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Older news]]></title>
		<content:encoded><![CDATA[<p>Again <img src="https://cdn.example.com/uploads/hello.png"></p>]]></content:encoded>
		<wp:post_id>11</wp:post_id>
		<wp:post_date><![CDATA[2023-05-06 07:08:09]]></wp:post_date>
		<wp:post_name><![CDATA[older-news]]></wp:post_name>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title></title>
		<content:encoded><![CDATA[<p>No date, no title.</p>]]></content:encoded>
		<wp:post_id>12</wp:post_id>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Unfinished post]]></title>
		<content:encoded><![CDATA[<p>Draft.</p>]]></content:encoded>
		<wp:post_id>13</wp:post_id>
		<wp:post_date><![CDATA[2025-01-01 00:00:00]]></wp:post_date>
		<wp:post_name><![CDATA[unfinished-post]]></wp:post_name>
		<wp:status><![CDATA[draft]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Broken id]]></title>
		<wp:post_id>abc</wp:post_id>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[Duplicate]]></title>
		<wp:post_id>10</wp:post_id>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title><![CDATA[hello.png]]></title>
		<wp:post_id>20</wp:post_id>
		<wp:post_name><![CDATA[hello-png]]></wp:post_name>
		<wp:status><![CDATA[inherit]]></wp:status>
		<wp:post_parent>10</wp:post_parent>
		<wp:post_type><![CDATA[attachment]]></wp:post_type>
		<wp:attachment_url><![CDATA[https://cdn.example.com/uploads/hello.png]]></wp:attachment_url>
	</item>
	<item>
		<title><![CDATA[Home]]></title>
		<wp:post_id>30</wp:post_id>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_type><![CDATA[nav_menu_item]]></wp:post_type>
	</item>
</channel>
</rss>
"#;

pub const TRUNCATED_WXR: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0" xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
	<title>Cut short</title>
	<item>
		<title><![CDATA[About]]></title>
		<wp:post_id>2</wp:post_id>
		<wp:post_type><![CDATA[page]]></wp:post_type>
"#;

/// Serves canned bodies and records every call made. URLs containing
/// `unreachable` fail at the network level, `missing` ones with a 404.
pub struct MemoryFetcher {
    pub calls: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        MemoryFetcher { calls: RefCell::new(vec![]) }
    }
}

impl MediaFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        if url.contains("unreachable") {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        if url.contains("missing") {
            return Err(FetchError::Status(404));
        }
        Ok(format!("bytes of {}", url).into_bytes())
    }
}
