//! Launcher-script rendering
//!
//! The launcher is pure generated text: a POSIX sh script that parses
//! its own options, splits its positionals into input paths plus one
//! output path, resolves the hadoop installation at its own runtime,
//! and submits the bundled artifact to the streaming jar. Nothing is
//! executed here.

/// Render the launcher script for `job_name` with the role-argument
/// block already rendered by the caller.
pub fn render_launcher(job_name: &str, args_block: &str) -> String {
    format!(
        r#"#!/bin/sh
confswitch=""
streaming=""
while getopts ":c:s:" opt; do
	case $opt in
		c) confswitch="--config $OPTARG";;
		s) streaming="$OPTARG";;
		\?) echo "Invalid option: -$OPTARG"; exit 1;;
		:) echo "Option -$OPTARG requires an argument."; exit 1;;
	esac
done
shift $((OPTIND-1))

if [ $# -lt 2 ]
then
	echo "Usage: $0 [OPTION...] HDFSINPUTPATH... HDFSOUTPUTPATH"
	echo ""
	echo "HDFSINPUTPATH can be repeated to use multiple paths as input for the job."
	echo ""
	echo "Options:"
	echo " -c HADOOPCONFDIR  Gets passed to hadoop via "--config" (see hadoop help)."
	echo " -s STREAMINGJAR   Path to hadoop-streaming-*.jar"
	echo ""
	exit 1
fi

input=""
output=""
index=0
for path in $*
do
	index=`expr $index + 1`
	if [ $index -ne $# ]
	then
		input=$input" -input $path"
	else
		output="-output $path"
	fi
done

if [ $HADOOP_HOME ]
then
	hadoop=$HADOOP_HOME/bin/hadoop
	if [ -z $streaming ]
	then
		streaming=$HADOOP_HOME"/contrib/streaming/hadoop-streaming-*.jar"
	fi
else
	hadoop="hadoop"
	if [ -z $streaming ]
	then
		streaming="/usr/lib/hadoop/contrib/streaming/hadoop-streaming-*.jar"
	fi
fi
dir=`dirname $0`

$hadoop $confswitch jar $streaming \
{args_block}
$input \
$output \
-file $dir/{job_name}.phar
"#
    )
}
