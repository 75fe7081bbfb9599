use std::sync::Arc;

use serde_json::json;
use smart_grading::clients::mock::{MockGenerator, MockReply};
use smart_grading::clients::Usage;
use smart_grading::models::{
    Competence, GradingRequest, QuestionType, SolutionPathway, ValuePoints,
};
use smart_grading::test_support::{
    classification_json, feedback_json, handwritten_answer, handwritten_numerical_request,
    numerical_question, textual_question, typed_numerical_request, typed_textual_request,
    value_points_json,
};
use smart_grading::workflow::{GradingFlow, ModelRoster};

fn flow(mock: &Arc<MockGenerator>) -> GradingFlow {
    GradingFlow::new(mock.clone(), ModelRoster::default())
}

fn usage(input: u64, output: u64, cost: f64) -> Usage {
    Usage::new(input, output, cost)
}

#[tokio::test]
async fn test_typed_numerical_standard_runs_every_step() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::structured(classification_json("standard_approach"), usage(100, 10, 0.001)),
        MockReply::text("Step 1 correct. Step 2 correct.", usage(200, 50, 0.002)),
        MockReply::structured(feedback_json(2.0, 2.0), usage(300, 60, 0.003)),
        MockReply::structured(value_points_json(), usage(150, 20, 0.0005)),
    ]));
    let request = typed_numerical_request();
    let typed = request.answer.student_answer_typed.clone();

    let response = flow(&mock).run(request).await;

    assert!(response.success, "{:?}", response.error_message);
    assert!(response.error_message.is_none());
    assert_eq!(response.extracted_answer.as_deref(), Some(typed.as_str()));
    assert_eq!(response.solution_pathway, Some(SolutionPathway::StandardApproach));
    assert_eq!(
        response.content_analysis.as_deref(),
        Some("Step 1 correct. Step 2 correct.")
    );
    assert_eq!(response.mark, Some(2.0));
    assert_eq!(response.input_tokens, 750);
    assert_eq!(response.output_tokens, 140);
    assert!((response.cost - 0.0065).abs() < 1e-12);

    let value_points = response.value_points.unwrap();
    assert_eq!(value_points.formulating, Competence::Demonstrated);
    assert_eq!(value_points.interpreting_evaluating, Competence::NotDemonstrated);

    // 键入作答不调用提取
    let calls = mock.calls();
    let labels: Vec<_> = calls.iter().map(|call| call.label).collect();
    assert_eq!(
        labels,
        vec![
            "solution_pathway_analyzer",
            "content_analyzer",
            "feedback_generator",
            "value_point_analyzer"
        ]
    );
    assert!(calls.iter().all(|call| call.model == "gemini-2.0-flash"));
    assert!(calls.iter().all(|call| call.images.is_empty()));
    assert!(calls[1].user_prompt.contains(&typed));
}

#[tokio::test]
async fn test_total_row_is_appended_to_criteria() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::structured(classification_json("standard_approach"), Usage::default()),
        MockReply::text("analysis", Usage::default()),
        MockReply::structured(feedback_json(1.0, 2.0), Usage::default()),
        MockReply::structured(value_points_json(), Usage::default()),
    ]));

    let response = flow(&mock).run(typed_numerical_request()).await;

    let feedback = response.feedback.unwrap();
    assert_eq!(feedback.criteria.len(), 3);
    let total = feedback.total().unwrap();
    assert_eq!(total.criterion, "Total");
    assert_eq!(total.marks, "1/2");
    assert_eq!(total.comment, "Clear and complete working.");
}

#[tokio::test]
async fn test_handwritten_extraction_failure_stops_the_run() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::error("upstream timeout"),
        MockReply::structured(classification_json("standard_approach"), usage(1, 1, 1.0)),
    ]));

    let response = flow(&mock).run(handwritten_numerical_request()).await;

    assert!(!response.success);
    let message = response.error_message.unwrap();
    assert!(message.starts_with("Extraction failed:"), "{}", message);
    assert!(message.contains("upstream timeout"));
    assert_eq!(response.cost, 0.0);
    assert_eq!(response.input_tokens, 0);
    assert_eq!(response.output_tokens, 0);
    assert!(response.extracted_answer.is_none());
    assert!(response.solution_pathway.is_none());
    assert!(response.feedback.is_none());
    assert!(response.mark.is_none());
    assert!(response.value_points.is_none());

    // 失败后不再调用生成能力
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.remaining_replies(), 1);
}

#[tokio::test]
async fn test_handwritten_answer_is_extracted_from_images() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::text("S = 4πr^2, dS/dt = 8π", usage(500, 30, 0.0001)),
        MockReply::structured(classification_json("standard_approach"), Usage::default()),
        MockReply::text("analysis", Usage::default()),
        MockReply::structured(feedback_json(2.0, 2.0), Usage::default()),
        MockReply::structured(value_points_json(), Usage::default()),
    ]));
    let request = handwritten_numerical_request();
    let images = request.answer.student_answer_image_urls.clone();

    let response = flow(&mock).run(request).await;

    assert!(response.success);
    assert_eq!(response.extracted_answer.as_deref(), Some("S = 4πr^2, dS/dt = 8π"));

    let calls = mock.calls();
    assert_eq!(calls[0].label, "extractor");
    assert_eq!(calls[0].images, images);
    assert_eq!(calls[0].model, "gemini-2.0-flash");
    assert!(calls[1]
        .user_prompt
        .contains("Here is the extracted content from the student's handwritten work"));
    assert!(calls[1].user_prompt.contains("S = 4πr^2, dS/dt = 8π"));
}

#[tokio::test]
async fn test_image_answer_extraction_uses_top_tier() {
    let mut question = textual_question();
    question.question_type = QuestionType::ImageAnswer;
    let request = GradingRequest::new(question, handwritten_answer(&["https://example.com/graph.png"]));
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::text("A parabola opening upward", Usage::default()),
        MockReply::text("analysis", Usage::default()),
        MockReply::structured(feedback_json(2.0, 3.0), Usage::default()),
    ]));

    let response = flow(&mock).run(request).await;

    assert!(response.success, "{:?}", response.error_message);
    assert_eq!(mock.calls()[0].model, "gemini-2.5-pro");
    assert_eq!(response.value_points, Some(ValuePoints::NOT_APPLICABLE));
}

#[tokio::test]
async fn test_single_overshoot_reruns_feedback_once() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::structured(classification_json("standard_approach"), usage(10, 1, 0.01)),
        MockReply::text("analysis", usage(10, 1, 0.01)),
        MockReply::structured(feedback_json(5.0, 2.0), usage(10, 1, 0.01)),
        MockReply::structured(feedback_json(1.5, 2.0), usage(10, 1, 0.01)),
        MockReply::structured(value_points_json(), usage(10, 1, 0.01)),
    ]));

    let response = flow(&mock).run(typed_numerical_request()).await;

    assert!(response.success);
    assert_eq!(response.mark, Some(1.5));
    assert_eq!(mock.calls_for("feedback_generator"), 2);
    // 两次评分的费用都计入
    assert_eq!(response.input_tokens, 50);
    assert!((response.cost - 0.05).abs() < 1e-12);
}

#[tokio::test]
async fn test_persistent_overshoot_is_accepted_after_second_attempt() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::structured(classification_json("standard_approach"), Usage::default()),
        MockReply::text("analysis", Usage::default()),
        MockReply::structured(feedback_json(5.0, 2.0), Usage::default()),
        MockReply::structured(feedback_json(5.0, 2.0), Usage::default()),
        MockReply::structured(value_points_json(), Usage::default()),
    ]));

    let state = flow(&mock).run_to_state(typed_numerical_request()).await;

    assert!(state.success);
    assert!(!state.validation_passed);
    assert_eq!(state.retry_attempt, 2);
    assert_eq!(state.mark, Some(5.0));
    assert!(state.value_points.is_some());
    assert_eq!(mock.calls_for("feedback_generator"), 2);
    assert_eq!(mock.remaining_replies(), 0);
}

#[tokio::test]
async fn test_irrelevant_pathway_selects_irrelevant_variant() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::structured(
            json!({
                "solution_pathway": "irrelevant_approach",
                "reason_for_classification": "Computes the volume instead of the surface area.",
            }),
            Usage::default(),
        ),
        MockReply::text("No valid step.", Usage::default()),
        MockReply::structured(
            json!({
                "criteria": [["Identifies the quantity", "0/2", "Volume is not asked for."]],
                "total_points": ["0/2", "The method does not address surface area."],
                "mark": 0.0,
            }),
            Usage::default(),
        ),
        MockReply::structured(value_points_json(), Usage::default()),
    ]));

    let response = flow(&mock).run(typed_numerical_request()).await;

    assert!(response.success);
    assert_eq!(response.solution_pathway, Some(SolutionPathway::IrrelevantApproach));

    let calls = mock.calls();
    let content = &calls[1];
    assert!(content.user_prompt.contains("classified as irrelevant"));
    assert!(content
        .user_prompt
        .contains("Computes the volume instead of the surface area."));

    let feedback = &calls[2];
    assert_eq!(feedback.schema_name, Some("numerical_feedback_irrelevant"));
    assert!(feedback
        .user_prompt
        .contains("Computes the volume instead of the surface area."));
}

#[tokio::test]
async fn test_alternative_pathway_upgrades_basic_question_to_mid_tier() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::structured(
            classification_json("acceptable_alternative_approach"),
            Usage::default(),
        ),
        MockReply::text("analysis", Usage::default()),
        MockReply::structured(feedback_json(2.0, 2.0), Usage::default()),
        MockReply::structured(value_points_json(), Usage::default()),
    ]));

    let response = flow(&mock).run(typed_numerical_request()).await;

    assert!(response.success);
    let calls = mock.calls();
    assert_eq!(calls[0].model, "gemini-2.0-flash");
    assert_eq!(calls[1].model, "gemini-2.5-flash");
    assert_eq!(calls[2].model, "gemini-2.5-flash");
    assert_eq!(calls[2].schema_name, Some("numerical_feedback"));
    // 能力点评估固定使用基础档位
    assert_eq!(calls[3].model, "gemini-2.0-flash");
}

#[tokio::test]
async fn test_textual_question_skips_pathway_and_value_point_generation() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::text("Definition given, products named.", usage(80, 40, 0.001)),
        MockReply::structured(feedback_json(3.0, 3.0), usage(90, 30, 0.002)),
    ]));

    let response = flow(&mock).run(typed_textual_request()).await;

    assert!(response.success, "{:?}", response.error_message);
    assert_eq!(response.solution_pathway, Some(SolutionPathway::NotApplicable));
    assert_eq!(response.value_points, Some(ValuePoints::NOT_APPLICABLE));
    assert_eq!(response.input_tokens, 170);

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].label, "content_analyzer");
    assert_eq!(calls[1].schema_name, Some("textual_feedback"));
    // 中等复杂度使用中档模型
    assert!(calls.iter().all(|call| call.model == "gemini-2.5-flash"));
}

#[tokio::test]
async fn test_invalid_request_never_calls_generation() {
    let request = GradingRequest::new(numerical_question(), handwritten_answer(&[]));
    let mock = Arc::new(MockGenerator::new());

    let response = flow(&mock).run(request).await;

    assert!(!response.success);
    assert_eq!(response.cost, 0.0);
    assert_eq!(mock.call_count(), 0);
    assert!(response
        .error_message
        .unwrap()
        .starts_with("Invalid request:"));
}

#[tokio::test]
async fn test_mid_run_failure_keeps_prior_totals() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::structured(classification_json("standard_approach"), usage(100, 10, 0.01)),
        MockReply::error("rate limited"),
    ]));

    let response = flow(&mock).run(typed_numerical_request()).await;

    assert!(!response.success);
    assert!(response
        .error_message
        .as_deref()
        .unwrap()
        .starts_with("Content Analysis failed:"));
    assert_eq!(response.solution_pathway, Some(SolutionPathway::StandardApproach));
    assert!(response.content_analysis.is_none());
    assert!(response.feedback.is_none());
    assert_eq!(response.input_tokens, 100);
    assert_eq!(response.output_tokens, 10);
    assert!((response.cost - 0.01).abs() < 1e-12);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_malformed_total_points_fail_feedback_generation() {
    let mock = Arc::new(MockGenerator::with_replies([
        MockReply::structured(classification_json("standard_approach"), Usage::default()),
        MockReply::text("analysis", Usage::default()),
        MockReply::structured(
            json!({
                "criteria": [["Step 1", "1/1", "ok"]],
                "total_points": ["1/2"],
                "mark": 1.0,
            }),
            usage(10, 10, 0.5),
        ),
    ]));

    let response = flow(&mock).run(typed_numerical_request()).await;

    assert!(!response.success);
    assert!(response
        .error_message
        .unwrap()
        .starts_with("Feedback Generation failed:"));
    assert!(response.mark.is_none());
    // 失败步骤不计费
    assert_eq!(response.cost, 0.0);
    assert_eq!(mock.call_count(), 3);
}
