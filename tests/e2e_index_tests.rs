use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;

use autotorrent_index::config::ClientConfig;
use autotorrent_index::{AppConfig, Indexer, RocksStore, Store};

#[test]
fn test_paths_and_clients_survive_reopen() {
    let tmp = tempdir().unwrap();
    let base = fs::canonicalize(tmp.path()).unwrap();
    let media = base.join("media");
    let release = media.join("Some.Release");
    fs::create_dir_all(&release).unwrap();
    fs::write(release.join("a.rar"), "rar").unwrap();
    fs::write(release.join("a.sfv"), "sfv").unwrap();
    fs::write(media.join("skip.part"), "partial").unwrap();

    let manifest = base.join("deluge.json");
    fs::write(
        &manifest,
        format!(
            r#"{{ "torrents": [ {{ "infohash": "abc", "name": "Some.Release",
                 "download_path": "{}",
                 "files": [ {{ "path": "Some.Release/a.rar", "size": 3 }} ] }} ] }}"#,
            media.display()
        ),
    )
    .unwrap();

    let mut clients = BTreeMap::new();
    clients.insert(
        "deluge".to_string(),
        ClientConfig {
            manifest: manifest.clone(),
        },
    );
    let config = AppConfig {
        store_path: base.join("index.db"),
        root_paths: vec![media.to_string_lossy().into_owned()],
        ignore_patterns: vec!["*.part".to_string()],
        clients,
    };

    {
        let store = RocksStore::open(&config.store_path).unwrap();
        let mut indexer = Indexer::new(store, &config.ignore_patterns).unwrap();
        indexer.scan_paths(config.root_paths.as_slice(), true).unwrap();

        let opened = config.open_clients(&[]).unwrap();
        let summary = indexer.scan_clients(&opened, false, false).unwrap();
        assert_eq!(summary.clients["deluge"].torrents_indexed, 1);
    }

    let store = RocksStore::open(&config.store_path).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.files, 2);
    assert_eq!(stats.unsplitable_roots, 1);
    assert_eq!(stats.torrents, 1);
    assert_eq!(stats.torrent_paths, 1);

    assert_eq!(
        store.unsplitable_roots().unwrap(),
        vec![release.to_string_lossy().into_owned()]
    );
    let torrents = store.torrent_files("deluge").unwrap();
    assert_eq!(
        torrents[0].paths,
        vec![(release.join("a.rar").to_string_lossy().into_owned(), 3)]
    );
}

#[test]
fn test_open_clients_filters_by_name() {
    let tmp = tempdir().unwrap();
    let manifest = tmp.path().join("empty.json");
    fs::write(&manifest, r#"{ "torrents": [] }"#).unwrap();

    let mut config = AppConfig::default();
    for name in ["deluge", "rtorrent"] {
        config.clients.insert(
            name.to_string(),
            ClientConfig {
                manifest: manifest.clone(),
            },
        );
    }

    let opened = config.open_clients(&["rtorrent".to_string()]).unwrap();
    assert_eq!(opened.keys().collect::<Vec<_>>(), vec!["rtorrent"]);
}
