use std::{net::SocketAddr, time::Duration};

use expr_server::{Server, ServerConfig};
use pretty_assertions::assert_eq;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{tcp::OwnedReadHalf, tcp::OwnedWriteHalf, TcpStream},
};

async fn start_server() -> SocketAddr {
    let config = ServerConfig {
        port: 0,
        worker_threads: Some(2),
        computation_timeout: Duration::from_secs(2),
        queue_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let server = Server::bind(&config).await.unwrap();
    let address = server.local_addr().unwrap();
    tokio::spawn(server.run());
    address
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(address: SocketAddr) -> Self {
        let (reader, writer) = TcpStream::connect(address).await.unwrap().into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn request(&mut self, line: &str) -> String {
        self.send(line).await;
        self.lines.next_line().await.unwrap().unwrap()
    }
}

fn fields(response: &str) -> Vec<&str> {
    response.split(';').collect()
}

#[tokio::test]
async fn test_round_trip() {
    let mut client = Client::connect(start_server().await).await;

    let response = client.request("MIN_GRID;x:0:1:2;(x+1)").await;
    let parts = fields(&response);
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "OK");
    assert_eq!(parts[1].split('.').nth(1).map(str::len), Some(3));
    assert_eq!(parts[2], "1.000000");

    assert_eq!(
        client.request("MIN_GRID;x:0:1:2;(x/0)").await,
        "ERR;(EvaluationError) Error while evaluating the expression '(x/0)' : \
         Undefined result (0/0) at node '(x/0)'"
    );
}

#[tokio::test]
async fn test_requests_are_answered_in_order() {
    let mut client = Client::connect(start_server().await).await;

    // pipelined writes, answered one at a time
    client.send("MAX_GRID;x:0:1:2;(x+1)").await;
    client.send("hello").await;
    client.send("COUNT_LIST;x:0:1:4;x").await;

    let mut responses = Vec::new();
    for _ in 0..3 {
        responses.push(client.lines.next_line().await.unwrap().unwrap());
    }
    assert_eq!(fields(&responses[0])[2], "3.000000");
    assert_eq!(responses[1], "ERR;(FormatError) Invalid request format");
    assert_eq!(fields(&responses[2])[2], "5.000000");
}

#[tokio::test]
async fn test_invalid_utf8_keeps_connection_open() {
    let mut client = Client::connect(start_server().await).await;
    assert_eq!(
        fields(&client.request("MIN_GRID;x:0:1:2;(x+1)").await)[2],
        "1.000000"
    );

    client.writer.write_all(b"\xff\xfe\n").await.unwrap();
    assert_eq!(
        client.lines.next_line().await.unwrap().as_deref(),
        Some("ERR;(FormatError) Invalid request format")
    );

    assert_eq!(
        fields(&client.request("MAX_GRID;x:0:1:2;(x+1)").await)[2],
        "3.000000"
    );
}

#[tokio::test]
async fn test_crlf_line_endings() {
    let mut client = Client::connect(start_server().await).await;
    client
        .writer
        .write_all(b"COUNT_GRID;x:0:1:2;x\r\n")
        .await
        .unwrap();
    let response = client.lines.next_line().await.unwrap().unwrap();
    assert_eq!(fields(&response)[2], "3.000000");
}

#[tokio::test]
async fn test_stats_and_quit() {
    let address = start_server().await;
    let mut client = Client::connect(address).await;

    client.request("MIN_GRID;x:0:1:2;(x+1)").await;
    client.request("MIN_GRID;x:0:1:2").await;
    let response = client.request("STAT_REQS").await;
    assert_eq!(fields(&response)[2], "2.000000");

    let response = client.request("STAT_MAX_TIME").await;
    assert!(response.starts_with("OK;"));

    client.send("BYE").await;
    assert_eq!(client.lines.next_line().await.unwrap(), None);

    // stats are shared across connections
    let mut other = Client::connect(address).await;
    let response = other.request("STAT_REQS").await;
    assert_eq!(fields(&response)[2], "4.000000");
}
