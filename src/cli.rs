use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doc-verify")]
#[command(about = "AI identity document verification tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 書類画像を検証
    Verify {
        /// 書類画像ファイル（jpg/png/webp/heic/pdf）
        #[arg(required = true)]
        file: PathBuf,

        /// 結果JSONの保存先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 結果をJSONで標準出力へ
        #[arg(long)]
        json: bool,

        /// 演出用の進捗待ちを省略
        #[arg(long)]
        no_progress_delay: bool,

        /// 使用するGeminiモデル（設定ファイルより優先）
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 設定管理
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
