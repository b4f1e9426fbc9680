use std::io;

fn main() -> io::Result<()> {
    let mut args = std::env::args();
    args.next();

    if let (Some(comm), Some(root_str)) = (args.next(), args.next()) {
        coagraph::runner(&comm, &root_str, args)
    } else {
        eprintln!("usage: coagraph <run|run-all|graphs|collapse> <root> [args]");
        std::process::exit(2);
    }
}
