use clap::Parser;
use qa_insights::{cli, config, convert, error, export, insights, logging, report};
use cli::{Cli, Commands};
use config::Config;
use error::{QaInsightsError, Result};
use qa_insights_common::{build_review, review, Classifier, ReviewFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    match cli.command {
        Commands::Convert { input, output, no_preview } => {
            println!("📊 qa-insights - Excel変換\n");

            let input = input.unwrap_or_else(|| config.input_workbook.clone());
            let output = output.unwrap_or_else(|| config.dataset_script.clone());
            let classifier = Classifier::standard()?;

            println!("[1/2] 読み込み中: {}", input.display());
            let dataset = convert::convert_workbook(&input, &output, &classifier)?;
            println!("✔ 読み込み完了\n");

            println!("[2/2] 結果");
            report::print_convert_summary(&dataset, &output);
            if !no_preview {
                report::print_classification_preview(&dataset);
            }

            println!("\n✅ 変換完了");
        }

        Commands::Insights { key, data, output, model } => {
            println!("🤖 qa-insights - AIサマリ生成\n");

            if let Some(model) = model {
                config.model = model;
            }
            let data = data.unwrap_or_else(|| config.dataset_script.clone());
            let output = output.unwrap_or_else(|| config.insights_file.clone());

            println!("[1/3] データ読み込み中: {}", data.display());
            let records = insights::load_dataset(&data)?;
            println!("✔ {}件を読み込み\n", records.len());

            let api_key = match config.resolve_api_key(key.as_deref()) {
                Some(key) => key,
                None => prompt_api_key()?,
            };

            println!("[2/3] サマリ生成中... (モデル: {})", config.model);
            let client = insights::GeminiClient::new(&config, api_key);
            tracing::debug!(endpoint = %client.endpoint(), "Gemini エンドポイント");
            let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
            let document = insights::generate_insights(&records, &client, generated_at).await;
            println!("✔ 生成完了\n");

            println!("[3/3] 保存中...");
            export::write_insights(&output, &document)?;
            report::print_insights_summary(&document, &output);

            println!("\n✅ 完了");
        }

        Commands::Review { data, month, date_range, module, category, impact, search } => {
            let data = data.unwrap_or_else(|| config.dataset_script.clone());
            let records = insights::load_dataset(&data)?;

            let filter = ReviewFilter {
                month,
                date_range,
                module,
                category,
                impact,
                search,
            };
            if let Some(month) = &filter.month {
                let ranges = review::date_ranges_for_month(&records, month);
                println!("{} の期間: {}", month, ranges.join(", "));
            } else {
                println!("月: {}", review::months(&records).join(", "));
            }

            let hits = filter.apply(&records);
            report::print_review(&build_review(&hits));
        }

        Commands::Classify { text } => {
            let classifier = Classifier::standard()?;
            report::print_classification(&text, &classifier.classify(&text));
        }

        Commands::Config { set_api_key, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.generate_content_url());
                println!("  入力Excel: {}", config.input_workbook.display());
                println!("  データセット: {}", config.dataset_script.display());
                println!("  サマリ出力: {}", config.insights_file.display());
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

/// 非表示入力でAPIキーを尋ねる。空ならエラー
fn prompt_api_key() -> Result<String> {
    let key = dialoguer::Password::new()
        .with_prompt("Gemini APIキー")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| QaInsightsError::Prompt(e.to_string()))?;

    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(QaInsightsError::MissingApiKey);
    }
    Ok(key)
}
