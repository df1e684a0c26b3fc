use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_channel::{Receiver, Sender};
use lazy_static::lazy_static;
use log::{error, info};
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    config::Config,
    map::LayerMap,
    models::Dataset,
    render::RenderSummary,
    search::{HttpSearchClient, SearchBackend, SearchForm},
    viewer::ListingViewer,
};

const HELP: &str = "These commands are supported:
  search <kml path> [name=value ...]   submit the search form with an area file
  set <field>=<value> ...              edit filter fields
  filter [<field>=<value> ...]         edit filter fields, then apply them
  show                                 list what is on the map
  export [path]                        write the map overlays as GeoJSON
  help                                 show this message
  quit                                 leave

Filter fields: studio, shared (on/off), rent-min, rent-max, bedrooms-min, bedrooms-max.
Example: filter studio=on shared=off rent-min=500 rent-max=1500";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Search {
        path: String,
        fields: Vec<(String, String)>,
    },
    Set(Vec<(String, String)>),
    Filter(Vec<(String, String)>),
    Show,
    Export(Option<String>),
    Quit,
}

fn parse_assignments(args: &[&str]) -> Result<Vec<(String, String)>> {
    lazy_static! {
        static ref ASSIGNMENT_REGEX: Regex = Regex::new(r"^([A-Za-z][\w-]*)=(.*)$").unwrap();
    }

    args.iter()
        .map(|arg| {
            ASSIGNMENT_REGEX
                .captures(arg)
                .and_then(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| anyhow!("expected name=value, got '{}'", arg))
        })
        .collect()
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "search" => {
            let (path, rest) = args
                .split_first()
                .ok_or_else(|| anyhow!("search needs the path of a KML file"))?;
            Command::Search {
                path: path.to_string(),
                fields: parse_assignments(rest)?,
            }
        }
        "set" => {
            if args.is_empty() {
                return Err(anyhow!("set needs at least one field=value"));
            }
            Command::Set(parse_assignments(args)?)
        }
        "filter" => Command::Filter(parse_assignments(args)?),
        "show" => Command::Show,
        "export" => match args {
            [] => Command::Export(None),
            [path] => Command::Export(Some(path.to_string())),
            _ => return Err(anyhow!("export takes at most one path")),
        },
        "quit" | "exit" => Command::Quit,
        other => return Err(anyhow!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

pub fn describe_map(map: &LayerMap) -> Vec<String> {
    let mut lines = vec![format!(
        "view: center=({:.5}, {:.5}) zoom={} base layers={}",
        map.center().lat,
        map.center().lng,
        map.zoom(),
        map.tiles().count()
    )];

    for polygon in map.polygons() {
        let points: usize = polygon.rings.iter().map(Vec::len).sum();
        lines.push(format!(
            "region: {} points, {} holes",
            points,
            polygon.rings.len().saturating_sub(1)
        ));
    }
    for marker in map.markers() {
        lines.push(format!(
            "marker: ({:.5}, {:.5}) {}",
            marker.position.lat,
            marker.position.lng,
            marker.popup.as_deref().unwrap_or("")
        ));
    }
    lines
}

fn print_summary(summary: &RenderSummary) {
    println!(
        "{} listings shown, {} regions drawn",
        summary.markers, summary.regions
    );
}

fn apply_fields(viewer: &mut ListingViewer<LayerMap>, fields: &[(String, String)]) -> Result<()> {
    let edited = viewer.form().with_fields(fields)?;
    *viewer.form_mut() = edited;
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

struct Console {
    config: Arc<Config>,
    client: HttpSearchClient,
    viewer: ListingViewer<LayerMap>,
    responses: Sender<Result<Dataset>>,
}

impl Console {
    fn spawn_search(&self, path: String, fields: Vec<(String, String)>) {
        let client = self.client.clone();
        let responses = self.responses.clone();
        let file_field = self.config.search_file_field.clone();

        tokio::spawn(async move {
            let response = match SearchForm::from_kml_file(&file_field, &path).await {
                Ok(form) => {
                    let form = fields
                        .iter()
                        .fold(form, |form, (name, value)| form.with_field(name, value));
                    client.search(form).await
                }
                Err(err) => Err(err),
            };
            if responses.send(response).await.is_err() {
                error!("Search for {} finished after the console closed", path);
            }
        });
    }

    async fn export(&self, path: Option<String>) -> Result<()> {
        let path = path
            .or_else(|| self.config.export_path.clone())
            .ok_or_else(|| anyhow!("export needs a path (or export_path in the config)"))?;
        let geojson = serde_json::to_string_pretty(&self.viewer.map().to_geojson())?;
        tokio::fs::write(&path, geojson)
            .await
            .with_context(|| format!("failed to write {}", path))?;
        println!("Map written to {}", path);
        Ok(())
    }

    async fn handle(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Help => println!("{}", HELP),
            Command::Search { path, fields } => {
                println!("Searching with {}...", path);
                self.spawn_search(path, fields);
            }
            Command::Set(fields) => apply_fields(&mut self.viewer, &fields)?,
            Command::Filter(fields) => {
                apply_fields(&mut self.viewer, &fields)?;
                print_summary(&self.viewer.submit_filters()?);
            }
            Command::Show => {
                for line in describe_map(self.viewer.map()) {
                    println!("{}", line);
                }
            }
            Command::Export(path) => self.export(path).await?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn complete_search(&mut self, response: Result<Dataset>) {
        match self.viewer.complete_search(response) {
            Ok(summary) => print_summary(&summary),
            Err(err) => println!("{:#}", err),
        }
    }
}

/// Reads commands from stdin until `quit` or end of input. Searches run in
/// the background; filters keep working against the dataset already loaded.
pub async fn run(config: Arc<Config>) -> Result<()> {
    let (responses, results): (Sender<Result<Dataset>>, Receiver<Result<Dataset>>) =
        async_channel::unbounded();

    let mut console = Console {
        client: HttpSearchClient::from_config(&config),
        viewer: ListingViewer::new(&config.map, LayerMap::new(config.map.tile_max_zoom)),
        config: config.clone(),
        responses,
    };
    info!("Searching against {}", console.client.endpoint());
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    }
                };
                match console.handle(command).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(err) => println!("{:#}", err),
                }
            }
            Ok(response) = results.recv() => console.complete_search(response),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_not_a_command() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn parses_search_with_extra_fields() {
        let command = parse_command("search areas/camden.kml radius=2").unwrap();
        assert_eq!(
            command,
            Some(Command::Search {
                path: "areas/camden.kml".to_string(),
                fields: vec![("radius".to_string(), "2".to_string())],
            })
        );
    }

    #[test]
    fn parses_filter_assignments() {
        let command = parse_command("filter studio=on rent-min=500 rent-max=").unwrap();
        assert_eq!(
            command,
            Some(Command::Filter(vec![
                ("studio".to_string(), "on".to_string()),
                ("rent-min".to_string(), "500".to_string()),
                ("rent-max".to_string(), "".to_string()),
            ]))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("search").is_err());
        assert!(parse_command("set").is_err());
        assert!(parse_command("set studio").is_err());
        assert!(parse_command("launch").is_err());
        assert!(parse_command("export a b").is_err());
    }

    #[test]
    fn rejected_edit_keeps_the_form() {
        let config = crate::config::create_test_config();
        let mut viewer = ListingViewer::new(&config.map, LayerMap::default());
        viewer.form_mut().set_rent_range("100", "");

        let fields = vec![
            ("rent-min".to_string(), "500".to_string()),
            ("studio".to_string(), "maybe".to_string()),
        ];
        assert!(apply_fields(&mut viewer, &fields).is_err());
        assert_eq!(viewer.form().rent_min(), "100");

        let fields = vec![
            ("rent-min".to_string(), "500".to_string()),
            ("studio".to_string(), "on".to_string()),
        ];
        apply_fields(&mut viewer, &fields).unwrap();
        assert_eq!(viewer.form().rent_min(), "500");
        assert!(viewer.form().studio());
    }

    #[test]
    fn export_path_is_optional() {
        assert_eq!(parse_command("export").unwrap(), Some(Command::Export(None)));
        assert_eq!(
            parse_command("EXPORT out.geojson").unwrap(),
            Some(Command::Export(Some("out.geojson".to_string())))
        );
    }
}
