use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qa-insights")]
#[command(about = "QA観察レポートの変換・自動分類・AIサマリ生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Excelレポートをデータセットスクリプト（data.js）に変換
    Convert {
        /// 入力Excelファイル（デフォルト: 設定の input_workbook）
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 出力スクリプト（デフォルト: 設定の dataset_script）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 分類プレビュー表を表示しない
        #[arg(long)]
        no_preview: bool,
    },

    /// 期間ごとのAIサマリを生成して insights.json に保存
    Insights {
        /// Gemini APIキー（省略時は GEMINI_API_KEY → 設定ファイル → 入力）
        #[arg(short, long)]
        key: Option<String>,

        /// 入力スクリプト（デフォルト: 設定の dataset_script）
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// 出力JSON（デフォルト: 設定の insights_file）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// モデル名を上書き
        #[arg(long)]
        model: Option<String>,
    },

    /// データセットを絞り込んで横断レビューを表示
    Review {
        /// 入力スクリプト（デフォルト: 設定の dataset_script）
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// 月（例: "Feb 2026"）
        #[arg(long)]
        month: Option<String>,

        /// 期間（Date Range の完全一致）
        #[arg(long)]
        date_range: Option<String>,

        /// モジュール
        #[arg(long)]
        module: Option<String>,

        /// エラー分類（例: "UI"）
        #[arg(long)]
        category: Option<String>,

        /// 影響度の前方一致（例: "S1"）
        #[arg(long)]
        impact: Option<String>,

        /// 全フィールド検索
        #[arg(short, long)]
        search: Option<String>,
    },

    /// 観察テキストを分類して表示
    Classify {
        /// 観察テキスト
        #[arg(required = true)]
        text: String,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
