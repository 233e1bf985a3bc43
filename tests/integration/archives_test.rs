// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use subcrawl::infrastructure::archives::{ArchiveSource, ARCHIVE_SOURCES};
use subcrawl::utils::url_utils::url_within_domain;
use url::Url;

#[test]
fn test_archive_catalogue_is_consistent() {
    let names: HashSet<_> = ARCHIVE_SOURCES.iter().map(|s| s.name).collect();
    assert_eq!(names.len(), ARCHIVE_SOURCES.len());
    assert_eq!(ARCHIVE_SOURCES.len(), 7);

    for source in ARCHIVE_SOURCES {
        let base = Url::parse(source.base_url).unwrap();
        assert!(
            url_within_domain(&base, source.base_domain),
            "{} base url is outside {}",
            source.name,
            source.base_domain
        );
    }
}

#[test]
fn test_archive_lookup_is_case_insensitive() {
    let wayback = ArchiveSource::find("wayback").unwrap();
    assert_eq!(wayback.base_domain, "web.archive.org");
    assert_eq!(ArchiveSource::find(" ARQUIVO ").unwrap().name, "Arquivo");
    assert!(ArchiveSource::find("commoncrawl").is_none());
}

#[test]
fn test_archive_request_uses_name_as_hint() {
    let source = ArchiveSource::find("ArchiveToday").unwrap();
    let request = source.request("www.example.com", "example.com");

    assert_eq!(request.allowed_base_domain, "archive.is");
    assert_eq!(request.target_domain, "example.com");
    assert_eq!(
        request.start_url(2024),
        "http://archive.is/2024/www.example.com"
    );
}
