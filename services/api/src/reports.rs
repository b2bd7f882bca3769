use crate::infra::InMemoryReviewRepository;
use clap::Args;
use dlist::config::AppConfig;
use dlist::error::AppError;
use dlist::workflows::onboarding::{meets_policy, PasswordStrength};
use dlist::workflows::reviews::{
    latest, RatingAggregator, ReviewDetailsPage, ReviewExport, ReviewExportImporter,
    ReviewPresentationService, SubjectId, SubjectSummaryView,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReviewSummaryArgs {
    /// Review export to read (.csv or .json)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Show the full review details for one subject instead of the per-subject table
    #[arg(long)]
    pub(crate) subject: Option<String>,
    /// Also list the N most recent published reviews
    #[arg(long)]
    pub(crate) latest: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct PasswordCheckArgs {
    /// Password to evaluate
    pub(crate) password: String,
}

pub(crate) fn run_review_summary(args: ReviewSummaryArgs) -> Result<(), AppError> {
    let ReviewSummaryArgs {
        input,
        subject,
        latest: latest_limit,
    } = args;

    let config = AppConfig::load()?;
    let export = ReviewExportImporter::from_path(&input)?;
    println!(
        "Loaded {} reviews from {}",
        export.reviews.len(),
        input.display()
    );

    let summaries = subject_summaries(&export, &config);
    let repository = Arc::new(InMemoryReviewRepository::from_export(export.clone()));
    let service = ReviewPresentationService::new(repository, &config.reviews);

    match subject {
        Some(subject_id) => {
            let page = service.review_details(&SubjectId(subject_id.clone()))?;
            render_details(&subject_id, &page);
        }
        None => render_summaries(&summaries),
    }

    if let Some(limit) = latest_limit {
        let published: Vec<_> = export
            .reviews
            .iter()
            .filter(|review| review.is_published())
            .collect();
        println!("\nLatest {limit} reviews");
        for review in latest(published, limit) {
            let score = service
                .aggregator()
                .review(review)
                .map(|score| format!("{:.1}", score.display))
                .unwrap_or_else(|| "no rating".to_string());
            println!(
                "  {} | {} | subject {} | by {} | {}",
                review.created_at.format("%Y-%m-%d %H:%M"),
                review.id,
                review.subject_id,
                review.contractor_id,
                score
            );
        }
    }

    Ok(())
}

pub(crate) fn run_password_check(args: PasswordCheckArgs) {
    let strength = PasswordStrength::evaluate(&args.password);
    println!(
        "Strength: {} ({}/5, {:.0}%)",
        strength.level.label(),
        strength.score,
        strength.percent
    );

    let rules = [
        ("At least 12 characters", strength.long_enough),
        ("Uppercase letter", strength.has_uppercase),
        ("Lowercase letter", strength.has_lowercase),
        ("Number", strength.has_digit),
        ("Special character", strength.has_special),
    ];
    for (label, passed) in rules {
        let marker = if passed { "ok" } else { "missing" };
        println!("  [{marker:>7}] {label}");
    }

    if meets_policy(&args.password) {
        println!("Meets the sign-up password policy.");
    } else {
        println!("Does not meet the sign-up password policy.");
    }
}

/// Pooled summary per subject, keyed by subject id for stable output.
fn subject_summaries(
    export: &ReviewExport,
    config: &AppConfig,
) -> BTreeMap<SubjectId, SubjectSummaryView> {
    let aggregator = RatingAggregator::new(config.reviews.unknown_subject);
    let mut grouped: BTreeMap<SubjectId, Vec<_>> = BTreeMap::new();
    for review in export.reviews.iter().filter(|review| review.is_published()) {
        grouped
            .entry(review.subject_id.clone())
            .or_default()
            .push(review);
    }

    grouped
        .into_iter()
        .map(|(subject, reviews)| {
            let summary = aggregator.subject(reviews.iter().copied());
            (subject, SubjectSummaryView::from(summary))
        })
        .collect()
}

fn render_summaries(summaries: &BTreeMap<SubjectId, SubjectSummaryView>) {
    println!("\nSubject scores");
    if summaries.is_empty() {
        println!("  No published reviews.");
        return;
    }

    for (subject, summary) in summaries {
        println!(
            "  {:<16} {:>9}  ({} rated reviews)",
            subject.0,
            score_label(summary.overall_score),
            summary.review_count
        );
    }
}

fn render_details(subject_id: &str, page: &ReviewDetailsPage) {
    match &page.subject {
        Some(header) => println!(
            "\n{} ({}) | {} | {}, {} {}",
            header.name, subject_id, header.project_type, header.city, header.state, header.zip
        ),
        None => {
            println!("\nNo published reviews for subject {subject_id}");
            return;
        }
    }
    println!(
        "Overall: {} from {} rated reviews",
        score_label(page.summary.overall_score),
        page.summary.review_count
    );

    for review in &page.reviews {
        println!(
            "\n  {} by {} on {}",
            review.review_id,
            review.display_identity.display_name,
            review.created_at.format("%Y-%m-%d")
        );
        println!("    Score: {}", score_label(review.score));
        for rating in &review.ratings {
            let value = rating
                .value
                .map(|value| format!("{value:.1}"))
                .unwrap_or_else(|| "-".to_string());
            println!("    {:<24} {}", rating.label, value);
        }
        if let Some(comments) = &review.comments {
            println!("    \"{comments}\"");
        }
        for attachment in &review.attachments {
            println!("    [{:?}] {}", attachment.kind, attachment.file_name);
        }
    }
}

fn score_label(score: Option<f64>) -> String {
    score
        .map(|score| format!("{score:.1} / 5"))
        .unwrap_or_else(|| "no rating".to_string())
}
