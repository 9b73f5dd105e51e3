use std::sync::Arc;

use clausetree_core::{
    AnalysisRequest, ClauseTreeService, FakeGenerator, FileTreeCache, OpenAiGenerator,
    TextGenerator,
};
use serde_json::json;
use tracing::info;

use super::input::{load_engine_config, load_tokens, read_file};
use super::output::{print_failure, print_tree};
use crate::cli::args::{AnalyzeArgs, Provider};
use crate::exit_codes;

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<i32> {
    let service = match build_service(&args) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let request = match build_request(&args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let result = service.analyze(request).await;
    service.flush().await;

    match result {
        Ok(analysis) => {
            info!(subject = %args.subject, source = %analysis.source, "analysis complete");
            print_tree(
                &analysis.tree,
                &analysis.diagnostics,
                json!({ "source": analysis.source }),
                args.engine.format,
            )?;
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            print_failure(&e, args.engine.format)?;
            Ok(e.exit_code())
        }
    }
}

fn build_service(args: &AnalyzeArgs) -> anyhow::Result<ClauseTreeService> {
    let mut config = load_engine_config(&args.engine)?;
    if args.refresh {
        config.refresh = true;
    }

    let generator: Arc<dyn TextGenerator> = match args.provider {
        Provider::Fake => {
            let path = args
                .fake_response
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--fake-response is required with --provider fake"))?;
            Arc::new(FakeGenerator::new().with_response(read_file(path, "fake response")?))
        }
        Provider::Openai => Arc::new(OpenAiGenerator::from_env(args.model.clone())?),
    };

    let cache_dir = args.cache_dir.clone().or_else(|| config.cache_dir.clone());
    let ttl = config.cache_ttl_secs;
    let mut service = ClauseTreeService::new(config, generator);
    if let Some(dir) = cache_dir {
        let mut cache = FileTreeCache::with_dir(dir);
        if let Some(secs) = ttl {
            cache = cache.with_ttl_secs(secs);
        }
        service = service.with_cache(Arc::new(cache));
    }
    Ok(service)
}

fn build_request(args: &AnalyzeArgs) -> anyhow::Result<AnalysisRequest> {
    let prompt = read_file(&args.prompt_file, "prompt")?;
    let tokens = load_tokens(&args.source)?;
    let mut request = AnalysisRequest::new(args.subject.clone(), prompt, tokens);
    if let Some(language) = &args.language {
        request = request.with_language(language.clone());
    }
    Ok(request)
}
