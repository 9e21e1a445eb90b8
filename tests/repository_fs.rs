use sitepages::error::PageError;
use sitepages::model::{Page, PageType, Status, TEMPLATE_CATEGORY, TEMPLATE_PAGE, TEMPLATE_POST};
use sitepages::repository::PageRepository;
use sitepages::store::fs_backend::FsBackend;
use sitepages::store::{ContentStore, MetadataStore};
use std::fs;
use tempfile::TempDir;

fn repo_at(temp: &TempDir) -> PageRepository<FsBackend> {
    PageRepository::with_backend(FsBackend::new(temp.path().to_path_buf()))
}

#[test]
fn test_first_load_creates_document() {
    let temp = tempfile::tempdir().unwrap();
    let repo = repo_at(&temp);
    let doc = temp.path().join("test/data/pages.json");
    assert!(!doc.exists());

    repo.load_data("test").unwrap();

    assert_eq!(repo.get_all_pages("test").unwrap(), vec![Page::default()]);
    assert!(doc.exists());

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&doc).unwrap()).unwrap();
    let records = raw.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["ID"], 0);
}

#[test]
fn test_missing_route_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let repo = repo_at(&temp);

    match repo.get_by_route("test", "/missing", false) {
        Err(PageError::PageNotFound { domain, key }) => {
            assert_eq!(domain, "test");
            assert!(key.contains("/missing"));
        }
        other => panic!("expected not found, got {:?}", other),
    }
}

#[test]
fn test_metadata_survives_a_new_process() {
    let temp = tempfile::tempdir().unwrap();
    {
        let repo = repo_at(&temp);
        repo.add(
            "example.com",
            Page::new(1, "Home", "/")
                .with_template(TEMPLATE_PAGE)
                .with_status(Status::Published),
        )
        .unwrap();
        let mut post = Page::new(2, "Hello", "/hello")
            .with_template(TEMPLATE_POST)
            .with_parent(1, 1)
            .with_status(Status::Published);
        post.page_type = PageType::Post;
        post.author = "ana".to_string();
        repo.add("example.com", post).unwrap();
        repo.save_data("example.com").unwrap();
    }

    // Fresh repository: nothing cached, everything read back from disk
    let repo = repo_at(&temp);
    let pages = repo.get_all_pages("example.com").unwrap();
    let ids: Vec<i64> = pages.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);

    let post = repo.get_by_route("example.com", "/hello", false).unwrap();
    assert_eq!(post.page_type, PageType::Post);
    assert_eq!(post.author, "ana");

    let children = repo.get_pages("example.com", 1, Status::Published).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, 2);
}

#[test]
fn test_unsaved_add_is_not_on_disk() {
    let temp = tempfile::tempdir().unwrap();
    let repo = repo_at(&temp);
    repo.add("site", Page::new(4, "Draft", "/draft")).unwrap();
    assert_eq!(repo.get_all_pages("site").unwrap().len(), 2);

    let other = repo_at(&temp);
    assert_eq!(other.get_all_pages("site").unwrap().len(), 1);
}

#[test]
fn test_content_lives_in_its_own_file() {
    let temp = tempfile::tempdir().unwrap();
    let repo = repo_at(&temp);

    let page = Page::new(3, "About", "/about")
        .with_template(TEMPLATE_PAGE)
        .with_content("<h1>About</h1>");
    let report = repo.commit("site", page, true).unwrap();
    assert!(report.content_saved);
    assert!(report.metadata_saved);

    let body_file = temp.path().join("site/pages/3.html");
    assert_eq!(fs::read_to_string(&body_file).unwrap(), "<h1>About</h1>");

    let doc = fs::read_to_string(temp.path().join("site/data/pages.json")).unwrap();
    assert!(!doc.contains("<h1>About</h1>"));

    let fresh = repo_at(&temp);
    assert_eq!(fresh.get_by_id("site", 3, false).unwrap().content, "");
    assert_eq!(fresh.get_by_id("site", 3, true).unwrap().content, "<h1>About</h1>");
}

#[test]
fn test_content_read_reflects_moment_of_read() {
    let temp = tempfile::tempdir().unwrap();
    let repo = repo_at(&temp);
    repo.add("site", Page::new(1, "A", "/a")).unwrap();
    repo.save_content("site", 1, "first").unwrap();

    let snapshot = repo.get_by_id("site", 1, true).unwrap();
    repo.save_content("site", 1, "second").unwrap();

    assert_eq!(snapshot.content, "first");
    assert_eq!(repo.get_by_id("site", 1, true).unwrap().content, "second");
}

#[test]
fn test_non_utf8_body_still_returns_page() {
    let temp = tempfile::tempdir().unwrap();
    let repo = repo_at(&temp);
    repo.commit("site", Page::new(1, "Cafe", "/cafe"), false).unwrap();
    fs::create_dir_all(temp.path().join("site/pages")).unwrap();
    fs::write(temp.path().join("site/pages/1.html"), b"<p>Caf\xe9</p>").unwrap();

    let bare = repo.get_by_id("site", 1, false).unwrap();
    let full = repo.get_by_id("site", 1, true).unwrap();
    assert_eq!(Page { content: String::new(), ..full.clone() }, bare);
    assert_eq!(full.content, "<p>Caf\u{fffd}</p>");
}

#[test]
fn test_content_roundtrip_and_missing() {
    let temp = tempfile::tempdir().unwrap();
    let repo = repo_at(&temp);

    repo.save_content("test", 9, "hello").unwrap();
    assert_eq!(repo.load_content("test", 9).unwrap(), Some("hello".to_string()));
    assert_eq!(repo.load_content("test", 10).unwrap(), None);
}

#[test]
fn test_corrupt_document_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let data_dir = temp.path().join("broken/data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("pages.json"), "not json").unwrap();

    let repo = repo_at(&temp);
    assert!(matches!(
        repo.get_all_pages("broken"),
        Err(PageError::CorruptMetadata { .. })
    ));
    // The broken document is left as is
    assert_eq!(
        fs::read_to_string(data_dir.join("pages.json")).unwrap(),
        "not json"
    );
}

#[test]
fn test_reads_documents_written_elsewhere() {
    let temp = tempfile::tempdir().unwrap();
    let data_dir = temp.path().join("legacy/data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(
        data_dir.join("pages.json"),
        r#"[
            {"ID":1,"Parent":0,"Depth":0,"Title":"News","Description":"","Route":"/news",
             "Author":"","Status":1,"Category":2,"Type":0,"Template":"category",
             "PubDate":"2020-01-02T03:04:05Z","UpdateDate":"2020-01-02T03:04:05Z"},
            {"ID":2,"Title":"Item","Route":"/news/item","Status":1,"Template":"post","Type":1}
        ]"#,
    )
    .unwrap();

    let repo = repo_at(&temp);
    let categories = repo
        .get_category_pages("legacy", 2, Status::Published)
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].template, TEMPLATE_CATEGORY);
    assert_eq!(categories[0].pub_date.to_rfc3339(), "2020-01-02T03:04:05+00:00");

    let item = repo.get_by_id("legacy", 2, false).unwrap();
    assert_eq!(item.page_type, PageType::Post);
    assert_eq!(item.depth, 0);
}

#[test]
fn test_domains_have_separate_trees() {
    let temp = tempfile::tempdir().unwrap();
    let repo = repo_at(&temp);
    repo.commit("a.com", Page::new(1, "A", "/").with_content("a"), true).unwrap();
    repo.commit("b.com", Page::new(1, "B", "/").with_content("b"), true).unwrap();

    assert_eq!(repo.get_by_id("a.com", 1, true).unwrap().content, "a");
    assert_eq!(repo.get_by_id("b.com", 1, true).unwrap().content, "b");

    let backend = repo.backend();
    assert_eq!(backend.load_index("a.com").unwrap().unwrap()[1].title, "A");
    assert_eq!(backend.read_content("b.com", 1).unwrap().unwrap(), "b");
}
