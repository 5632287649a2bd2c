use std::collections::BTreeSet;

use seo_guard::plagiarism::EMPTY_CORPUS_WARNING;
use seo_guard::structure::{strip_link_targets, Structure};
use seo_guard::{
    authorize_export, quality, tokenize, Article, CheckStatus, Config, ConfigError, ContentItem,
    Engine, Error, ExportGate, GateError, GateInputs, GateState, InputError, PlagiarismDetector,
    PlagiarismReport, SimilarityMethod,
};

const META_DESCRIPTION: &str = "Plan kubernetes capacity with confidence: practical guidance on cluster sizing, autoscaling limits, cost reviews, and dashboards that keep teams on target.";

/// Fifty words with exactly one occurrence of "kubernetes".
fn paragraph(n: usize) -> String {
    format!(
        "Teams running kubernetes clusters in region {n} track costs weekly. \
         Operators review each deployment before the release window opens again. \
         Small services start quickly and recover well after node failures. \
         Good dashboards show latency, errors, and saturation for every team. \
         Budgets stay predictable when autoscaling limits are reviewed each month."
    )
}

fn article_with_paragraphs(count: usize) -> Article {
    Article {
        title: "Kubernetes Cost Planning for Platform Teams".to_string(),
        meta_title: "Kubernetes Cost Planning: A Practical Guide for Platform Teams".to_string(),
        meta_description: META_DESCRIPTION.to_string(),
        slug: "kubernetes-cost-planning".to_string(),
        target_keyword: "kubernetes".to_string(),
        body: (0..count).map(paragraph).collect(),
    }
}

fn engine() -> Engine {
    let config = Config {
        reference_year: Some(2026),
        ..Config::default()
    };
    Engine::new(config).unwrap()
}

const ARTICLE_SENTENCES: [&str; 10] = [
    "Container images should be small and rebuilt on every merge.",
    "Our platform group migrated forty services during the spring quarter.",
    "Readiness probes keep traffic away from pods that are still starting.",
    "The finance office asked for a monthly breakdown of compute spend.",
    "Horizontal autoscaling reacts to load faster than manual capacity planning.",
    "Several engineers volunteered to document the incident response runbooks.",
    "Namespaces give each team a clear boundary for quotas and access.",
    "A weekly review meeting keeps the migration backlog visible to everyone.",
    "New hires pair with a mentor for their first three on-call shifts.",
    "The roadmap for next year focuses on developer experience improvements.",
];

fn partly_copied_article() -> Article {
    Article {
        title: "Kubernetes Platform Notes".to_string(),
        meta_title: String::new(),
        meta_description: String::new(),
        slug: "kubernetes-platform-notes".to_string(),
        target_keyword: "kubernetes".to_string(),
        body: ARTICLE_SENTENCES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Contains article sentences 0, 2, 4 and 6 verbatim.
fn reference_corpus() -> Vec<ContentItem> {
    vec![
        ContentItem::new(
            "ref-a",
            "forum",
            format!(
                "{} {} Cluster upgrades are scheduled outside business hours.",
                ARTICLE_SENTENCES[0], ARTICLE_SENTENCES[2]
            ),
        ),
        ContentItem::new(
            "ref-b",
            "blog",
            format!(
                "Logs are shipped to a central store for auditing. {} {}",
                ARTICLE_SENTENCES[4], ARTICLE_SENTENCES[6]
            ),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Gate scenarios
// ---------------------------------------------------------------------------

#[test]
fn well_formed_article_with_original_text_is_approved() {
    let article = article_with_paragraphs(50);
    let engine = engine();
    let evaluation = engine.evaluate(&article, &[]).unwrap();

    let seo = evaluation.seo();
    assert_eq!(seo.word_count, 2500);
    assert!(
        (seo.keyword_density - 0.02).abs() < 1e-9,
        "density was {}",
        seo.keyword_density
    );
    assert!(seo.mandatory_failures().is_empty(), "{:?}", seo.mandatory_failures());

    let plagiarism = PlagiarismReport {
        originality_score: 0.97,
        measures: Vec::new(),
        flagged_sentences: BTreeSet::new(),
        corpus_size: 3,
        warnings: Vec::new(),
    };
    let decision = ExportGate::new(engine.config()).decide(seo, &plagiarism, evaluation.quality());
    assert!(decision.approved());
    assert!(decision.reasons().is_empty());
    assert_eq!(decision.state(), GateState::Approved);
    assert!(authorize_export(&decision).is_ok());
}

#[test]
fn empty_corpus_is_vacuously_original_with_warning() {
    let article = article_with_paragraphs(50);
    let evaluation = engine().evaluate(&article, &[]).unwrap();
    let plagiarism = evaluation.plagiarism();

    assert_eq!(plagiarism.originality_score, 1.0);
    assert_eq!(plagiarism.corpus_size, 0);
    assert_eq!(plagiarism.warnings, vec![EMPTY_CORPUS_WARNING.to_string()]);
    assert_eq!(plagiarism.measures.len(), 3);
    assert!(plagiarism.measures.iter().all(|m| m.score == 1.0));
    assert!(evaluation.approved());
}

#[test]
fn short_article_fails_mandatory_word_count() {
    let article = article_with_paragraphs(30);
    let evaluation = engine().evaluate(&article, &[]).unwrap();

    assert_eq!(evaluation.seo().word_count, 1500);
    let word_count = evaluation.seo().check("word_count").unwrap();
    assert_eq!(word_count.status, CheckStatus::Fail);
    assert!(word_count.is_mandatory);

    let decision = evaluation.decision();
    assert!(!decision.approved());
    assert_eq!(decision.state(), GateState::Blocked);
    assert!(decision.mandatory_failures().contains("word_count"));
    assert_eq!(
        decision.reasons(),
        &["mandatory check failed: word_count".to_string()]
    );

    match authorize_export(decision) {
        Err(GateError::ExportBlocked { reasons }) => assert_eq!(reasons, decision.reasons()),
        other => panic!("expected blocked export, got {other:?}"),
    }
}

#[test]
fn verbatim_sentences_lower_originality_and_block_export() {
    let article = partly_copied_article();
    let corpus = reference_corpus();
    let config = Config::default();
    let report = PlagiarismDetector::new(&config)
        .detect(&article, &corpus)
        .unwrap();

    let sentence = report.measure(SimilarityMethod::SentenceDup).unwrap();
    assert!(
        (sentence.score - 0.6).abs() < 1e-9,
        "sentence contribution was {}",
        sentence.score
    );
    assert_eq!(report.flagged_sentences, BTreeSet::from([0, 2, 4, 6]));
    assert!(report.originality_score < 0.95);
    assert!(sentence
        .matched_spans
        .iter()
        .any(|s| s.reference_id == "ref-a" && s.article_span == ARTICLE_SENTENCES[0]));

    let engine = engine();
    let passing = engine.evaluate(&article_with_paragraphs(50), &[]).unwrap();
    let decision =
        ExportGate::new(&config).decide(passing.seo(), &report, passing.quality());
    assert!(!decision.approved());
    assert_eq!(decision.reasons().len(), 1);
    assert!(
        decision.reasons()[0].starts_with("originality below threshold:"),
        "{:?}",
        decision.reasons()
    );
    assert!(decision.reasons()[0].ends_with("< 95%"));
    assert_eq!(decision.flagged_sentences(), &BTreeSet::from([0, 2, 4, 6]));
}

#[test]
fn mandatory_failures_take_precedence_over_originality() {
    let short = engine().evaluate(&article_with_paragraphs(30), &[]).unwrap();
    let copied = PlagiarismDetector::new(&Config::default())
        .detect(&partly_copied_article(), &reference_corpus())
        .unwrap();
    let decision = ExportGate::default().decide(short.seo(), &copied, short.quality());

    assert!(!decision.approved());
    assert!(decision
        .reasons()
        .iter()
        .all(|r| r.starts_with("mandatory check failed:")));
}

#[test]
fn gate_is_pending_until_all_reports_exist() {
    let evaluation = engine().evaluate(&article_with_paragraphs(50), &[]).unwrap();
    let gate = ExportGate::default();

    let partial = GateInputs {
        seo: Some(evaluation.seo()),
        plagiarism: Some(evaluation.plagiarism()),
        quality: None,
    };
    assert_eq!(gate.state(partial), GateState::Pending);
    assert!(gate.evaluate(partial).is_none());

    let complete = GateInputs {
        quality: Some(evaluation.quality()),
        ..partial
    };
    assert_eq!(gate.state(complete), GateState::Approved);
}

#[test]
fn nan_originality_blocks() {
    let evaluation = engine().evaluate(&article_with_paragraphs(50), &[]).unwrap();
    let mut plagiarism = evaluation.plagiarism().clone();
    plagiarism.originality_score = f64::NAN;
    let decision = ExportGate::default().decide(evaluation.seo(), &plagiarism, evaluation.quality());
    assert!(!decision.approved());
    assert_eq!(decision.reasons().len(), 1);
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[test]
fn one_result_per_catalog_entry_in_order() {
    let engine = engine();
    let evaluation = engine.evaluate(&article_with_paragraphs(12), &[]).unwrap();
    let ids: Vec<&str> = evaluation
        .seo()
        .checks
        .iter()
        .map(|c| c.check_id.as_str())
        .collect();
    let catalog: Vec<&str> = engine.config().catalog.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, catalog);
    assert!(ids.len() >= 30, "catalog has {} checks", ids.len());
}

#[test]
fn scores_stay_in_unit_interval() {
    let evaluation = engine()
        .evaluate(&partly_copied_article(), &reference_corpus())
        .unwrap();
    for check in &evaluation.seo().checks {
        assert!(
            (0.0..=1.0).contains(&check.score),
            "{} scored {}",
            check.check_id,
            check.score
        );
    }
    let q = evaluation.quality();
    for score in [q.readability_score, q.structural_score, q.composite_score] {
        assert!((0.0..=1.0).contains(&score));
    }
    for m in &evaluation.plagiarism().measures {
        assert!((0.0..=1.0).contains(&m.score));
    }
}

#[test]
fn evaluation_is_idempotent() {
    let engine = engine();
    let article = partly_copied_article();
    let corpus = reference_corpus();
    let first = serde_json::to_string(&engine.evaluate(&article, &corpus).unwrap()).unwrap();
    let second = serde_json::to_string(&engine.evaluate(&article, &corpus).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn corpus_order_does_not_change_plagiarism_report() {
    let detector = PlagiarismDetector::new(&Config::default());
    let article = partly_copied_article();
    let corpus = reference_corpus();
    let mut reversed = corpus.clone();
    reversed.reverse();

    assert_eq!(
        detector.detect(&article, &corpus).unwrap(),
        detector.detect(&article, &reversed).unwrap()
    );
}

#[test]
fn quality_report_flags_long_paragraphs() {
    let mut article = article_with_paragraphs(3);
    article.body[1] = format!("{} {} {} {}", paragraph(1), paragraph(2), paragraph(3), paragraph(4));
    let report = quality::score(&article).unwrap();
    assert_eq!(report.long_paragraphs, vec![1]);
    assert_eq!(report.signals.len(), 5);
    assert!(
        (report.composite_score - (0.5 * report.readability_score + 0.5 * report.structural_score))
            .abs()
            < 1e-12
    );
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn malformed_articles_fail_fast() {
    let engine = engine();

    let mut untitled = article_with_paragraphs(2);
    untitled.title = "  ".to_string();
    assert!(matches!(
        engine.evaluate(&untitled, &[]),
        Err(Error::Input(InputError::MissingField { field: "title" }))
    ));

    let mut no_keyword = article_with_paragraphs(2);
    no_keyword.target_keyword = String::new();
    assert!(matches!(
        engine.evaluate(&no_keyword, &[]),
        Err(Error::Input(InputError::MissingField { field: "target_keyword" }))
    ));

    let mut punctuation_only = article_with_paragraphs(2);
    punctuation_only.body = vec!["... !!!".to_string()];
    assert!(matches!(
        engine.evaluate(&punctuation_only, &[]),
        Err(Error::Input(InputError::NoSentences))
    ));
}

#[test]
fn check_that_cannot_compute_is_isolated() {
    let mut config = Config {
        reference_year: Some(2026),
        ..Config::default()
    };
    let density = config
        .catalog
        .iter_mut()
        .find(|c| c.id == "keyword_density")
        .unwrap();
    density.bounds.remove("min");

    let engine = Engine::new(config).unwrap();
    let evaluation = engine.evaluate(&article_with_paragraphs(50), &[]).unwrap();
    let seo = evaluation.seo();

    assert_eq!(seo.checks.len(), engine.config().catalog.len());
    let broken = seo.check("keyword_density").unwrap();
    assert_eq!(broken.status, CheckStatus::Fail);
    assert_eq!(broken.score, 0.0);
    assert!(broken.message.contains("could not be evaluated"), "{}", broken.message);
    assert_eq!(seo.check("word_count").unwrap().status, CheckStatus::Pass);
    assert!(evaluation.approved());
}

#[test]
fn mandatory_check_that_cannot_compute_blocks() {
    let mut config = Config::default();
    let word_count = config
        .catalog
        .iter_mut()
        .find(|c| c.id == "word_count")
        .unwrap();
    word_count.bounds.remove("max");

    let evaluation = Engine::new(config)
        .unwrap()
        .evaluate(&article_with_paragraphs(50), &[])
        .unwrap();
    assert!(!evaluation.approved());
    assert!(evaluation.decision().mandatory_failures().contains("word_count"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn partial_config_keeps_defaults() {
    let config = Config::from_json_str(r#"{"thresholds": {"originality": 0.9}}"#).unwrap();
    assert_eq!(config.thresholds.originality, 0.9);
    assert_eq!(config.thresholds.ngram_size, 5);
    assert_eq!(config.thresholds.sentence_match, 0.85);
    assert_eq!(config.catalog.len(), Config::default().catalog.len());
    assert_eq!(ExportGate::new(&config).originality_threshold(), 0.9);
}

#[test]
fn invalid_config_is_rejected() {
    assert!(matches!(
        Config::from_json_str(r#"{"thresholds": {"originality": 1.5}}"#),
        Err(ConfigError::Invalid { .. })
    ));
    assert!(matches!(
        Config::from_json_str("{not json"),
        Err(ConfigError::Parse(_))
    ));

    let mut config = Config::default();
    let first = config.catalog[0].clone();
    config.catalog.push(first);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DuplicateCheck(id)) if id == "word_count"
    ));
    assert!(matches!(Engine::new(config), Err(Error::Config(_))));
}

#[test]
fn default_config_round_trips_through_json() {
    let json = serde_json::to_string(&Config::default()).unwrap();
    assert_eq!(Config::from_json_str(&json).unwrap(), Config::default());
}

// ---------------------------------------------------------------------------
// Tokenizer and keywords
// ---------------------------------------------------------------------------

#[test]
fn words_are_lowercased_and_keep_inner_punctuation() {
    assert_eq!(
        tokenize::words("Don\u{2019}t panic: well-known APIs, 42 times!"),
        vec!["don't", "panic", "well-known", "apis", "42", "times"]
    );
    assert!(tokenize::words("").is_empty());
}

#[test]
fn sentences_respect_abbreviations_and_blocks() {
    let text = "Dr. Smith arrived. He left!\n\n## Next steps\nMore text here.";
    assert_eq!(
        tokenize::sentences(text),
        vec!["Dr. Smith arrived.", "He left!", "## Next steps", "More text here."]
    );
    assert!(tokenize::sentences("   ").is_empty());
}

#[test]
fn ngrams_slide_over_words() {
    let words = tokenize::words("a b c");
    let grams: Vec<String> = tokenize::ngrams(&words, 2).collect();
    assert_eq!(grams, vec!["a b", "b c"]);
    assert_eq!(tokenize::ngrams(&words, 2).len(), 2);
    assert_eq!(tokenize::ngrams(&words, 4).count(), 0);
    assert_eq!(tokenize::ngrams(&words, 0).count(), 0);
}

#[test]
fn syllable_estimates() {
    assert_eq!(tokenize::syllables("table"), 2);
    assert_eq!(tokenize::syllables("make"), 1);
    assert_eq!(tokenize::syllables("rhythm"), 1);
    assert_eq!(tokenize::syllables("kubernetes"), 4);
}

#[test]
fn keywords_cluster_by_shared_context() {
    let corpus = vec![
        ContentItem::new(
            "a",
            "search",
            "Kubernetes pods scale clusters. Kubernetes pods scale clusters. Kubernetes pods scale clusters.",
        ),
        ContentItem::new(
            "b",
            "forum",
            "Sourdough bread needs flour. Sourdough bread needs flour.",
        ),
    ];
    let keywords = engine().extract_keywords(&corpus, "kubernetes");
    assert_eq!(keywords.len(), 8);

    let cluster = |term: &str| {
        keywords
            .iter()
            .find(|k| k.term == term)
            .map(|k| k.cluster_id)
            .unwrap()
    };
    for term in ["kubernetes", "pods", "scale", "clusters"] {
        assert_eq!(cluster(term), 0, "{term}");
    }
    for term in ["sourdough", "bread", "needs", "flour"] {
        assert_eq!(cluster(term), 1, "{term}");
    }

    let relevance = |term: &str| keywords.iter().find(|k| k.term == term).unwrap().relevance;
    assert!(relevance("pods") > relevance("flour"));
}

#[test]
fn keyword_extraction_ignores_stopwords_and_short_terms() {
    let corpus = vec![ContentItem::new(
        "a",
        "search",
        "It is a fact that we go to the cluster. The cluster is up.",
    )];
    let keywords = engine().extract_keywords(&corpus, "cluster");
    let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
    assert!(terms.contains(&"cluster"));
    assert!(terms.contains(&"fact"));
    assert!(!terms.contains(&"the"));
    assert!(!terms.contains(&"go"));
}

// ---------------------------------------------------------------------------
// Keyword matching in titles and meta fields
// ---------------------------------------------------------------------------

#[test]
fn keyword_found_in_hyphenated_and_possessive_titles() {
    let engine = engine();
    for title in [
        "Kubernetes-Native Cost Planning for Platform Teams",
        "Kubernetes's Hidden Costs and How to Plan for Them",
    ] {
        let mut article = article_with_paragraphs(50);
        article.title = title.to_string();
        article.meta_title = title.to_string();
        let evaluation = engine.evaluate(&article, &[]).unwrap();
        let seo = evaluation.seo();
        assert_eq!(
            seo.check("keyword_in_title").unwrap().status,
            CheckStatus::Pass,
            "{title}"
        );
        assert_eq!(
            seo.check("keyword_in_meta_title").unwrap().status,
            CheckStatus::Pass,
            "{title}"
        );
        assert!(evaluation.approved(), "{title}: {:?}", evaluation.decision().reasons());
    }
}

#[test]
fn match_words_split_compounds_and_drop_possessives() {
    assert_eq!(
        tokenize::match_words("Kubernetes-Native tools: Helm's charts"),
        vec!["kubernetes", "native", "tools", "helm", "charts"]
    );
}

#[test]
fn missing_title_keyword_blocks_export() {
    let mut article = article_with_paragraphs(50);
    article.title = "Cost Planning for Platform Teams".to_string();
    let evaluation = engine().evaluate(&article, &[]).unwrap();

    assert_eq!(
        evaluation.seo().check("keyword_in_title").unwrap().status,
        CheckStatus::Fail
    );
    assert!(!evaluation.approved());
    assert_eq!(
        evaluation.decision().reasons(),
        &["mandatory check failed: keyword_in_title".to_string()]
    );
}

#[test]
fn meta_description_bounds_are_exact() {
    let engine = engine();
    let with_length = |len: usize| {
        let mut article = article_with_paragraphs(50);
        article.meta_description = format!("kubernetes {}", "x".repeat(len - 11));
        assert_eq!(article.meta_description.chars().count(), len);
        engine.evaluate(&article, &[]).unwrap()
    };

    for len in [150, 160] {
        let evaluation = with_length(len);
        assert_eq!(
            evaluation.seo().check("meta_description_length").unwrap().status,
            CheckStatus::Pass,
            "length {len}"
        );
        assert!(evaluation.approved(), "length {len}");
    }
    for len in [149, 161] {
        let evaluation = with_length(len);
        assert_eq!(
            evaluation.seo().check("meta_description_length").unwrap().status,
            CheckStatus::Fail,
            "length {len}"
        );
        assert_eq!(
            evaluation.decision().reasons(),
            &["mandatory check failed: meta_description_length".to_string()],
            "length {len}"
        );
    }
}

#[test]
fn keyword_density_bound_has_no_rounding_tolerance() {
    let mut config = Config {
        reference_year: Some(2026),
        ..Config::default()
    };
    config
        .catalog
        .iter_mut()
        .find(|c| c.id == "keyword_density")
        .unwrap()
        .bounds
        .insert("max".to_string(), 0.02);

    // 50 occurrences in 2499 words: 0.020008, which rounds to 0.0200.
    let mut article = article_with_paragraphs(50);
    article.body[49] = article.body[49].replace(" opens again.", " opens.");

    let evaluation = Engine::new(config).unwrap().evaluate(&article, &[]).unwrap();
    let seo = evaluation.seo();
    assert_eq!(seo.word_count, 2499);
    let density = seo.check("keyword_density").unwrap();
    assert_ne!(density.status, CheckStatus::Pass, "{}", density.message);
    assert!(density.message.contains("0.0200"), "{}", density.message);
}

// ---------------------------------------------------------------------------
// Sentence boundaries
// ---------------------------------------------------------------------------

#[test]
fn ordinary_words_and_lone_letters_end_sentences() {
    assert_eq!(
        tokenize::sentences("The answer was no. We shipped anyway. Take vitamin C. It helps."),
        vec![
            "The answer was no.",
            "We shipped anyway.",
            "Take vitamin C.",
            "It helps."
        ]
    );
}

#[test]
fn initials_and_numbered_abbreviations_do_not_end_sentences() {
    assert_eq!(
        tokenize::sentences("John F. Kennedy spoke. J. R. R. Tolkien wrote."),
        vec!["John F. Kennedy spoke.", "J. R. R. Tolkien wrote."]
    );
    assert_eq!(
        tokenize::sentences("It ranked No. 5 overall. Plan A. The team agreed."),
        vec!["It ranked No. 5 overall.", "Plan A.", "The team agreed."]
    );
}

// ---------------------------------------------------------------------------
// Markdown handling
// ---------------------------------------------------------------------------

#[test]
fn link_targets_are_not_counted_as_words() {
    assert_eq!(
        strip_link_targets(
            "See [the guide](https://docs.example.com/platform/cost-planning-guide) now. \
             ![Cluster diagram](img/cluster.png)"
        ),
        "See the guide now. Cluster diagram"
    );

    let mut article = article_with_paragraphs(50);
    article.body[0].push_str(
        " See [the guide](https://docs.example.com/platform/cost-planning-guide) now.",
    );
    let evaluation = engine().evaluate(&article, &[]).unwrap();
    assert_eq!(evaluation.seo().word_count, 2504);
}

#[test]
fn heading_outline_violations() {
    let outline = |lines: &[&str]| {
        let body: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        Structure::parse(&body).hierarchy_violations()
    };

    assert!(outline(&["# Title", "## Setup", "### Details", "## Costs"]).is_empty());
    assert_eq!(outline(&["# Title", "### Skipped"]).len(), 1);
    assert_eq!(outline(&["# Title", "## Setup", "# Second title"]).len(), 1);
    assert_eq!(outline(&["### Too deep"]).len(), 1);
}

// ---------------------------------------------------------------------------
// Similarity measures
// ---------------------------------------------------------------------------

#[test]
fn identical_corpus_item_zeroes_ngram_and_tfidf_contributions() {
    let article = partly_copied_article();
    let corpus = vec![ContentItem::new("copy", "blog", article.body_text())];
    let report = PlagiarismDetector::new(&Config::default())
        .detect(&article, &corpus)
        .unwrap();

    let ngram = report.measure(SimilarityMethod::Ngram).unwrap();
    assert_eq!(ngram.score, 0.0);
    assert!(!ngram.matched_spans.is_empty());
    let tfidf = report.measure(SimilarityMethod::TfidfCosine).unwrap();
    assert!(tfidf.score < 1e-9, "tfidf contribution was {}", tfidf.score);
    assert!(tfidf.matched_spans.iter().all(|s| s.reference_id == "copy"));
    assert_eq!(report.flagged_sentences.len(), ARTICLE_SENTENCES.len());
}

#[test]
fn disjoint_vocabulary_is_fully_original() {
    let corpus = vec![ContentItem::new(
        "bakery",
        "forum",
        "Sourdough loaves rise slowly overnight beside warm ovens.",
    )];
    let report = PlagiarismDetector::new(&Config::default())
        .detect(&partly_copied_article(), &corpus)
        .unwrap();

    for measure in &report.measures {
        assert_eq!(measure.score, 1.0, "{:?}", measure.method);
        assert!(measure.matched_spans.is_empty());
    }
    assert_eq!(report.originality_score, 1.0);
    assert!(report.warnings.is_empty());
}

#[test]
fn corpus_without_text_is_treated_as_empty() {
    let corpus = vec![
        ContentItem::new("blank", "search", ""),
        ContentItem::new("dots", "forum", "  ... --- !!! "),
    ];
    let report = PlagiarismDetector::new(&Config::default())
        .detect(&partly_copied_article(), &corpus)
        .unwrap();

    assert_eq!(report.originality_score, 1.0);
    assert_eq!(report.corpus_size, 2);
    assert_eq!(report.warnings, vec![EMPTY_CORPUS_WARNING.to_string()]);
}
