mod common;

use common::*;
use rnc::validate::NO_RESULTS_MARKERS;
use rnc::{Corpus, Error, Query, SearchOptions, Subcorpus, ValidPages};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn single_page_is_validated_with_one_request() {
    let server = MockServer::start().await;
    mount_page(&server, 0, results_page(0, 1), 1).await;

    let ValidPages { first, last } = client(&server).validate(&params(), 1).await.unwrap();

    assert_eq!(first, last);
    assert_eq!(requested_pages(&server).await, vec![0]);
}

#[tokio::test]
async fn several_pages_are_validated_with_two_requests() {
    let server = MockServer::start().await;
    mount_page(&server, 0, results_page(0, 5), 1).await;
    mount_page(&server, 3, results_page(3, 5), 1).await;

    let pages = client(&server).validate(&params(), 4).await.unwrap();

    assert_eq!(pages.first, results_page(0, 5));
    assert_eq!(pages.last, results_page(3, 5));
    assert_eq!(requested_pages(&server).await, vec![0, 3]);
}

#[tokio::test]
async fn no_results_in_either_language() {
    for marker in NO_RESULTS_MARKERS {
        let server = MockServer::start().await;
        mount_page(&server, 0, no_results_page(marker), 1).await;

        let err = client(&server).validate(&params(), 3).await.unwrap_err();

        assert!(matches!(err, Error::NoResultFound), "{marker}: {err:?}");
        // the last page is never requested
        assert_eq!(requested_pages(&server).await, vec![0]);
    }
}

#[tokio::test]
async fn redirect_to_first_page_means_last_page_is_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(pagerless_page("Пример")))
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server).validate(&params(), 10).await.unwrap_err();

    assert!(matches!(
        err,
        Error::LastPageMissing {
            requested: 10,
            available: None
        }
    ));
}

#[tokio::test]
async fn distinct_last_page_without_pager_is_valid() {
    let server = MockServer::start().await;
    mount_page(&server, 0, pagerless_page("Первый"), 1).await;
    mount_page(&server, 1, pagerless_page("Второй"), 1).await;

    let pages = client(&server).validate(&params(), 2).await.unwrap();

    assert!(pages.last.contains("Второй"));
}

#[tokio::test]
async fn pager_shorter_than_requested_count() {
    let server = MockServer::start().await;
    mount_page(&server, 0, results_page(0, 3), 1).await;
    // the endpoint answers the out-of-range page with the first one
    mount_page(&server, 9, results_page(0, 3), 1).await;

    let err = client(&server).validate(&params(), 10).await.unwrap_err();

    assert!(matches!(
        err,
        Error::LastPageMissing {
            requested: 10,
            available: Some(3)
        }
    ));
}

#[tokio::test]
async fn failing_first_page_is_a_wrong_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("p", "0"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).validate(&params(), 2).await.unwrap_err();

    match err {
        Error::WrongRequest(inner) => {
            assert!(matches!(*inner, Error::Status { status, .. } if status.as_u16() == 404))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failing_last_page_is_a_wrong_request() {
    let server = MockServer::start().await;
    mount_page(&server, 0, results_page(0, 4), 1).await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("p", "3"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).validate(&params(), 4).await.unwrap_err();

    match err {
        Error::WrongRequest(inner) => {
            assert!(matches!(*inner, Error::Status { status, .. } if status.as_u16() == 500))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(requested_pages(&server).await, vec![0, 3]);
}

#[tokio::test]
async fn zero_pages_are_rejected_without_requests() {
    let server = MockServer::start().await;

    let err = client(&server).validate(&params(), 0).await.unwrap_err();

    assert!(matches!(err, Error::InvalidPageCount));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn free_function_validates_with_a_one_off_session() {
    let server = MockServer::start().await;
    mount_page(&server, 0, results_page(0, 1), 1).await;

    let pages = rnc::validate(&search_url(&server), &params(), 1).await.unwrap();

    assert_eq!(pages.first, results_page(0, 1));
}

#[tokio::test]
async fn single_page_search_costs_one_request() {
    let server = MockServer::start().await;
    mount_page(&server, 0, results_page(0, 1), 1).await;

    let pages = client(&server).search(&params(), 1).await.unwrap();

    assert_eq!(pages, vec![results_page(0, 1)]);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn search_reuses_validated_pages() {
    let server = MockServer::start().await;
    for page in 0..3 {
        mount_page(&server, page, results_page(page, 3), 1).await;
    }

    let pages = client(&server).search(&params(), 3).await.unwrap();

    let expected: Vec<String> = (0..3).map(|p| results_page(p, 3)).collect();
    assert_eq!(pages, expected);
    // first and last by the validator, the middle one by the dispatcher
    assert_eq!(requested_pages(&server).await, vec![0, 2, 1]);
}

#[tokio::test]
async fn search_stops_before_bulk_fetch_on_missing_last_page() {
    let server = MockServer::start().await;
    mount_page(&server, 0, results_page(0, 2), 1).await;
    mount_page(&server, 4, results_page(0, 2), 1).await;

    let err = client(&server).search(&params(), 5).await.unwrap_err();

    assert!(matches!(err, Error::LastPageMissing { .. }));
    assert_eq!(requested_pages(&server).await, vec![0, 4]);
}

#[tokio::test]
async fn corpus_requests_parses_and_caches_examples() {
    let server = MockServer::start().await;
    for page in 0..3 {
        mount_page(&server, page, results_page(page, 3), 1).await;
    }
    let client = client(&server);

    let mut corpus = Corpus::new(
        Query::word("дом"),
        3,
        Subcorpus::Main,
        &SearchOptions::default(),
    )
    .unwrap();
    corpus.request_examples(&client).await.unwrap();

    assert_eq!(corpus.len(), 3);
    let texts: Vec<String> = corpus.iter().map(|ex| ex.text()).collect();
    assert_eq!(texts, vec!["Пример дом 0.", "Пример дом 1.", "Пример дом 2."]);
    assert_eq!(corpus.get(1).unwrap().source(), "Автор. Книга 1");
    assert_eq!(corpus.found_wordforms().get("дом"), Some(&3));

    let err = corpus.request_examples(&client).await.unwrap_err();
    assert!(matches!(err, Error::DataExists));

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("houses");
    corpus.dump(&file).await.unwrap();
    let restored = Corpus::load(&file).await.unwrap();
    assert_eq!(restored.data(), corpus.data());
    assert_eq!(restored.p_count(), 3);
    assert_eq!(restored.query(), corpus.query());
}
