//! `scribeloop run` — one research → write → critique run.

use scribeloop_config::AppConfig;
use scribeloop_core::event::PipelineEvent;
use scribeloop_core::run::{RunState, Stage};
use scribeloop_core::PipelineError;
use scribeloop_pipeline::Pipeline;

pub async fn run(config: AppConfig, topic: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::from_config(&config)?;

    // Progress goes to stderr while the run is in flight.
    let mut events = pipeline.event_bus().subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let Some(line) = describe(&event) {
                eprintln!("{line}");
            }
        }
    });

    let result = pipeline.run(&topic).await;
    drop(pipeline);
    let _ = progress.await;

    match result {
        Ok(state) if json => println!("{}", serde_json::to_string_pretty(&state)?),
        Ok(state) => print!("{}", report(&state)),
        Err(PipelineError::EmptyTopic) => {
            return Err("Please enter a topic to proceed.".into());
        }
        Err(e) => {
            eprintln!("\n❌ Error executing workflow: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

fn describe(event: &PipelineEvent) -> Option<String> {
    let line = match event {
        PipelineEvent::RunStarted { topic, .. } => format!("🚀 Launching agents for: {topic}"),
        PipelineEvent::StageEntered { stage, pass, .. } => match stage {
            Stage::Research => "🔎 Researcher: searching the web...".to_string(),
            Stage::Write if *pass == 1 => "✍️  Writer: drafting".to_string(),
            Stage::Write => format!("✍️  Writer: revision {}", pass - 1),
            Stage::Critique => format!("🧐 Critic: review {pass}"),
            Stage::Done => return None,
        },
        PipelineEvent::SearchFailed { error_message, .. } => {
            format!("⚠️  Search failed, writing without results: {error_message}")
        }
        PipelineEvent::RevisionBudgetExhausted { revision_count, .. } => {
            format!("⚠️  Max revisions reached ({revision_count}), keeping the latest draft")
        }
        PipelineEvent::RunFinished {
            revision_count,
            approved,
            ..
        } => {
            let outcome = if *approved { "approved" } else { "not approved" };
            format!("✅ Workflow Finished! {revision_count} critic pass(es), {outcome}")
        }
        PipelineEvent::RunFailed { .. } => return None,
    };
    Some(line)
}

fn report(state: &RunState) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    out.push_str(&format!("\n{rule}\n📝 Final Blog Post\n{rule}\n\n"));
    out.push_str(if state.draft().is_empty() {
        "No content generated."
    } else {
        state.draft()
    });

    out.push_str(&format!("\n\n{rule}\n🔍 Research Data\n{rule}\n\n"));
    out.push_str(state.research_data());

    out.push_str(&format!("\n\n{rule}\n🧐 Critique History\n{rule}\n"));
    for (i, critique) in state.critiques().iter().enumerate() {
        out.push_str(&format!("\n--- Review {} ---\n{}\n", i + 1, critique));
    }

    out.push_str(&format!(
        "\nRun {} · {} critic pass(es) · {} draft(s)\n",
        state.run_id(),
        state.revision_count(),
        state.draft_count()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_entered(stage: Stage, pass: u32) -> PipelineEvent {
        PipelineEvent::StageEntered {
            run_id: "r".into(),
            stage,
            pass,
            timestamp: Default::default(),
        }
    }

    #[test]
    fn describes_stage_passes() {
        assert_eq!(describe(&stage_entered(Stage::Write, 1)).unwrap(), "✍️  Writer: drafting");
        assert_eq!(describe(&stage_entered(Stage::Write, 3)).unwrap(), "✍️  Writer: revision 2");
        assert_eq!(describe(&stage_entered(Stage::Critique, 2)).unwrap(), "🧐 Critic: review 2");
        assert!(describe(&stage_entered(Stage::Done, 0)).is_none());
    }

    #[test]
    fn report_lists_every_critique() {
        let mut state = RunState::new("Solar Power");
        state.record_research("notes");
        state.record_draft("# Solar Power");
        state.record_critique("needs more sources");
        state.record_draft("# Solar Power v2");
        state.record_critique("APPROVE");

        let text = report(&state);
        assert!(text.contains("# Solar Power v2"));
        assert!(text.contains("notes"));
        assert!(text.contains("--- Review 1 ---\nneeds more sources"));
        assert!(text.contains("--- Review 2 ---\nAPPROVE"));
        assert!(text.contains("2 critic pass(es)"));
    }
}
