#![allow(dead_code)]

use osm_extractor::config::ServiceConfig;
use serde_json::{json, Value};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

/// 代替 gol / osmium 的 shell 腳本
pub struct FakeTools {
    dir: TempDir,
}

const GOL_OK: &str = r#"#!/bin/sh
# gol query <dataset> -a <boundary> -f xml *
if [ "$1" != "query" ] || [ "$3" != "-a" ] || [ "$5" != "-f" ] || [ "$6" != "xml" ] || [ "$7" != "*" ]; then
  echo "unexpected arguments: $*" >&2
  exit 64
fi
printf '<osm dataset="%s">' "$2"
cat "$4"
printf '</osm>'
"#;

const GOL_FAIL: &str = r#"#!/bin/sh
echo "gol: cannot open index" >&2
exit 3
"#;

const GOL_LARGE: &str = r#"#!/bin/sh
# 8 MiB 的輸出
head -c 8388608 /dev/zero | tr '\0' 'x'
"#;

const GOL_SLOW: &str = r#"#!/bin/sh
sleep 1
printf '<osm slow="true"/>'
"#;

const OSMIUM_OK: &str = r#"#!/bin/sh
# osmium extract --polygon <boundary> <input.xml> -o <output.pbf>
if [ "$1" != "extract" ] || [ "$2" != "--polygon" ] || [ "$5" != "-o" ]; then
  echo "unexpected arguments: $*" >&2
  exit 64
fi
cp "$4" "$6"
"#;

const OSMIUM_FAIL: &str = r#"#!/bin/sh
echo "osmium: Unknown file type" >&2
exit 1
"#;

impl FakeTools {
    /// 每個測試執行檔只寫一次，避免寫檔與 fork 交錯造成 ETXTBSY
    pub fn get() -> &'static FakeTools {
        static TOOLS: OnceLock<FakeTools> = OnceLock::new();
        TOOLS.get_or_init(|| {
            let dir = TempDir::new().expect("tool dir");
            let tools = FakeTools { dir };
            tools.write("gol-ok", GOL_OK);
            tools.write("gol-fail", GOL_FAIL);
            tools.write("gol-large", GOL_LARGE);
            tools.write("gol-slow", GOL_SLOW);
            tools.write("osmium-ok", OSMIUM_OK);
            tools.write("osmium-fail", OSMIUM_FAIL);
            let spy = format!(
                "#!/bin/sh\ntouch \"{}\"\ncp \"$4\" \"$6\"\n",
                tools.osmium_marker().display()
            );
            tools.write("osmium-spy", &spy);
            tools
        })
    }

    fn write(&self, name: &str, script: &str) {
        let path = self.dir.path().join(name);
        std::fs::write(&path, script).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// osmium-spy 執行後留下的標記
    pub fn osmium_marker(&self) -> PathBuf {
        self.dir.path().join("osmium-ran")
    }
}

/// 單一測試的設定與暫存目錄
pub struct TestEnv {
    _temp: TempDir,
    pub config: ServiceConfig,
}

impl TestEnv {
    pub fn new(gol: &str, osmium: &str) -> Self {
        let tools = FakeTools::get();
        let temp = TempDir::new().expect("test dir");

        let mut config = ServiceConfig::default();
        config.extract.dataset_path = temp.path().join("england.gol");
        config.extract.gol_path = tools.path(gol);
        config.extract.osmium_path = tools.path(osmium);
        config.extract.workspace_root = Some(temp.path().join("work"));
        config.audit.log_path = temp.path().join("requests.log");

        Self {
            _temp: temp,
            config,
        }
    }

    pub fn workspace_root(&self) -> PathBuf {
        self.config.extract.workspace_root()
    }

    pub fn log_path(&self) -> &Path {
        &self.config.audit.log_path
    }

    pub fn audit_lines(&self) -> Vec<Value> {
        std::fs::read_to_string(self.log_path())
            .expect("audit log")
            .lines()
            .map(|line| serde_json::from_str(line).expect("audit line is JSON"))
            .collect()
    }

    /// 等待背景任務寫出稽核並清空工作區，最多 5 秒
    pub async fn wait_for_audit_and_cleanup(&self) {
        let mut waited = Duration::ZERO;
        while !(self.log_path().exists() && self.workspaces_cleaned())
            && waited < Duration::from_secs(5)
        {
            tokio::time::sleep(Duration::from_millis(50)).await;
            waited += Duration::from_millis(50);
        }
    }

    /// 工作區根目錄存在且已清空
    pub fn workspaces_cleaned(&self) -> bool {
        std::fs::read_dir(self.workspace_root())
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }
}

pub fn feature(geometry_type: &str, size: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": geometry_type,
            "coordinates": [[[0, 0], [0, size], [size, size], [size, 0], [0, 0]]]
        },
        "properties": {"requested_by": "integration-test"}
    })
}
